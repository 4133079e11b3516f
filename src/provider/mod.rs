//! Station providers.
//!
//! A provider integrates one external radio directory. It can search the
//! directory, resolve a station from its canonical URL, and tell whether a
//! URL belongs to it.
//!
//! # Architecture
//!
//! - [`StationProvider`]: Async trait every backend implements
//! - [`Capability`]: Operations a provider reports, checked by the registry
//! - [`iheart::IHeartRadioProvider`]: Built-in iHeartRadio backend
//!
//! # Example
//!
//! ```rust,no_run
//! use radioscout::provider::{iheart::IHeartRadioProvider, StationProvider};
//! use radioscout::HttpClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = IHeartRadioProvider::new(HttpClient::new()?);
//!
//! for station in provider.search("alt 1045", 5).await? {
//!     println!("{} ({})", station.name, station.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod iheart;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::station::Station;

/// An operation of the provider contract that may be missing from a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Search,
    Get,
    Match,
}

impl Capability {
    /// Every operation a provider must offer to be registered.
    pub const REQUIRED: [Capability; 3] = [Capability::Search, Capability::Get, Capability::Match];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Search => "search",
            Self::Get => "get",
            Self::Match => "match",
        })
    }
}

/// Backend that can find and resolve radio stations.
#[async_trait]
pub trait StationProvider: Send + Sync {
    /// Unique lowercase identifier (e.g., `"iheartradio"`).
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Base URL the provider operates against.
    fn base_url(&self) -> &str;

    /// Operations this provider actually implements.
    ///
    /// Compiled-in providers implement the whole trait. Providers backed by
    /// external code report what the external side declared.
    fn capabilities(&self) -> Vec<Capability> {
        Capability::REQUIRED.to_vec()
    }

    /// Search for up to `limit` stations matching `query`, each with a score.
    ///
    /// No match is an empty vec, not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Station>>;

    /// Resolve a single station from its canonical URL. The score is 0.
    async fn get(&self, station_url: &str) -> Result<Station>;

    /// Returns `true` if `url` belongs to this provider. Never does I/O.
    fn matches(&self, url: &str) -> bool;
}

impl fmt::Debug for dyn StationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Provider", self.name())
    }
}
