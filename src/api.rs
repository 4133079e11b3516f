//! Search and lookup across all registered providers.
//!
//! [`StationFinder`] is the entry point of the library: it searches every
//! provider and ranks the combined results, and it routes station URLs to
//! the provider that owns them.
//!
//! # Example
//!
//! ```rust,no_run
//! use radioscout::{Config, StationFinder};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let finder = StationFinder::from_config(&Config::load()?)?;
//!
//! let results = finder.search_stations("alt 1045", 5).await;
//! if let Some(top) = results.stations.first() {
//!     let station = finder.update_station_info(top).await?;
//!     println!("{station}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink, TracingSink};
use crate::provider::StationProvider;
use crate::registry::ProviderRegistry;
use crate::station::Station;

/// A provider that failed during a search.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: Error,
}

/// Combined outcome of a search over every provider.
#[derive(Debug, Default)]
pub struct SearchResults {
    /// Matches from all providers, highest score first.
    pub stations: Vec<Station>,
    /// Providers whose search failed; their results are missing.
    pub failures: Vec<ProviderFailure>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// `true` when nothing was found and at least one provider failed.
    pub fn all_failed(&self) -> bool {
        self.stations.is_empty() && !self.failures.is_empty()
    }
}

/// Searches and resolves stations over a [`ProviderRegistry`].
///
/// Providers are queried one after another in registry order.
pub struct StationFinder {
    registry: ProviderRegistry,
    sink: Arc<dyn EventSink>,
}

impl StationFinder {
    /// Finder over `registry` reporting to `tracing`.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_sink(registry, Arc::new(TracingSink))
    }

    pub fn with_sink(registry: ProviderRegistry, sink: Arc<dyn EventSink>) -> Self {
        Self { registry, sink }
    }

    /// Load providers from `config` and report to `tracing`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
        let registry = ProviderRegistry::from_config(config, sink.as_ref())?;
        Ok(Self::with_sink(registry, sink))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Providers in registry order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn StationProvider> {
        self.registry.providers()
    }

    /// Search every provider for `query` and rank the combined results.
    ///
    /// `limit` applies to each provider separately, so up to
    /// `limit * providers` stations can come back. A failing provider does not
    /// abort the search; it is reported in [`SearchResults::failures`].
    pub async fn search_stations(&self, query: &str, limit: usize) -> SearchResults {
        tracing::debug!("Querying providers for best results");
        let mut results = SearchResults::default();

        for provider in self.registry.providers() {
            match provider.search(query, limit).await {
                Ok(stations) => results.stations.extend(stations),
                Err(error) => {
                    self.sink.emit(&Event::ProviderFailed {
                        provider: provider.id().to_string(),
                        error: error.to_string(),
                    });
                    results.failures.push(ProviderFailure {
                        provider: provider.id().to_string(),
                        error,
                    });
                }
            }
        }

        if results.stations.is_empty() {
            self.sink.emit(&Event::NoResults {
                query: query.to_string(),
            });
        } else {
            self.sink.emit(&Event::ResultsFound {
                query: query.to_string(),
                count: results.stations.len(),
            });
            results
                .stations
                .sort_by(|a, b| b.score.total_cmp(&a.score));
        }

        results
    }

    /// Resolve a station from its URL using the first provider that claims it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMatchingProvider`] if no provider matches `url`, or
    /// the matching provider's error if the lookup fails.
    pub async fn get_station_info(&self, url: &str) -> Result<Station> {
        tracing::debug!("Beginning search for matching provider");
        let Some(provider) = self.registry.providers().find(|p| p.matches(url)) else {
            self.sink.emit(&Event::NoMatchingProvider {
                url: url.to_string(),
            });
            return Err(Error::NoMatchingProvider {
                url: url.to_string(),
            });
        };

        self.sink.emit(&Event::ProviderMatched {
            provider: provider.id().to_string(),
            url: url.to_string(),
        });

        provider.get(url).await.inspect_err(|error| {
            self.sink.emit(&Event::ProviderFailed {
                provider: provider.id().to_string(),
                error: error.to_string(),
            });
        })
    }

    /// Re-resolve `station` from its URL, e.g. to turn a search hit into a full record.
    pub async fn update_station_info(&self, station: &Station) -> Result<Station> {
        self.get_station_info(&station.url).await
    }
}
