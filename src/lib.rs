//! `radioscout` - Internet radio station discovery
//!
//! # Features
//!
//! - **Providers**: Pluggable station directories behind one async trait
//! - **Plugins**: External provider binaries declared in the config file
//! - **Search**: Query every provider and rank the combined results
//! - **Lookup**: Route a station URL to the provider that owns it
//! - **Streams**: Pick the best stream variant of a station
//!
//! # Example
//!
//! ```rust,no_run
//! use radioscout::{Config, StationFinder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let finder = StationFinder::from_config(&Config::load()?)?;
//!     let station = finder
//!         .get_station_info("https://www.iheart.com/live/alt-1045-3401/")
//!         .await?;
//!     let (label, url) = station.best_stream()?;
//!     println!("{}: {label} {url}", station.name);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod http_client;
pub mod plugin;
pub mod provider;
pub mod registry;
pub mod station;
pub mod stream;

pub use api::{ProviderFailure, SearchResults, StationFinder};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{Event, EventSink, NullSink, TracingSink};
pub use http_client::HttpClient;
pub use provider::{Capability, StationProvider};
pub use registry::{ProviderFactory, ProviderRegistry};
pub use station::{Station, StationId};
pub use stream::best_stream;

/// Version of radioscout
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
