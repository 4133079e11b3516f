//! Observability hooks for the discovery core.
//!
//! The library never configures global logging. Instead the registry and the
//! [`StationFinder`](crate::StationFinder) report what happened as [`Event`]s
//! to an [`EventSink`] supplied by the caller. [`TracingSink`] forwards them
//! to `tracing`, which is what the CLI uses.

use std::fmt;

/// Something worth reporting that happened while loading or querying providers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A provider was loaded and passed validation.
    ProviderLoaded { id: String },
    /// A plugin was instantiated but rejected by validation.
    PluginSkipped { name: String, reason: String },
    /// A plugin could not be instantiated.
    PluginLoadFailed { name: String, reason: String },
    /// A provider failed while serving a request.
    ProviderFailed { provider: String, error: String },
    /// A search finished with matches.
    ResultsFound { query: String, count: usize },
    /// A search finished without any match.
    NoResults { query: String },
    /// A provider claimed a station URL.
    ProviderMatched { provider: String, url: String },
    /// No provider claimed a station URL.
    NoMatchingProvider { url: String },
}

/// Severity of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Event {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ProviderLoaded { .. } => Severity::Debug,
            Self::ResultsFound { .. } | Self::ProviderMatched { .. } => Severity::Info,
            Self::PluginSkipped { .. } | Self::NoResults { .. } | Self::NoMatchingProvider { .. } => {
                Severity::Warning
            }
            Self::PluginLoadFailed { .. } | Self::ProviderFailed { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderLoaded { id } => write!(f, "Loaded provider {id}"),
            Self::PluginSkipped { name, reason } => write!(
                f,
                "Found plugin {name}, but skipped it as it was not a valid provider: {reason}"
            ),
            Self::PluginLoadFailed { name, reason } => {
                write!(f, "Failed to load plugin {name}: {reason}")
            }
            Self::ProviderFailed { provider, error } => {
                write!(f, "Provider {provider} failed: {error}")
            }
            Self::ResultsFound { count, .. } => write!(f, "Found {count} matching stations"),
            Self::NoResults { query } => write!(f, "No matching stations returned for '{query}'"),
            Self::ProviderMatched { provider, url } => {
                write!(f, "Found matching provider {provider} for {url}")
            }
            Self::NoMatchingProvider { url } => write!(f, "Unable to find matching provider for {url}"),
        }
    }
}

/// Receiver for discovery [`Event`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Forwards events to `tracing` at their [`Severity`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event) {
        match event.severity() {
            Severity::Debug => tracing::debug!(event = ?event, "{event}"),
            Severity::Info => tracing::info!(event = ?event, "{event}"),
            Severity::Warning => tracing::warn!(event = ?event, "{event}"),
            Severity::Error => tracing::error!(event = ?event, "{event}"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &Event) {}
}
