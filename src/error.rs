//! Error types for station discovery.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading providers, querying them, or picking streams.
#[derive(Error, Debug)]
pub enum Error {
    /// A plugin was instantiated but does not satisfy the provider contract.
    #[error("plugin '{name}' is not a valid provider: {reason}")]
    PluginInvalid { name: String, reason: String },

    /// A plugin could not be instantiated at all.
    #[error("failed to load plugin '{name}': {reason}")]
    PluginLoad { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Connection-level failure talking to a provider backend.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    /// The backend answered, but the payload was not what the provider expects.
    #[error("could not parse response from {url}: {reason}")]
    Parse { url: String, reason: String },

    /// An external plugin ran but broke its wire protocol.
    #[error("plugin '{name}' failed: {reason}")]
    Plugin { name: String, reason: String },

    #[error("no provider matches {url}")]
    NoMatchingProvider { url: String },

    #[error("station '{station}' has no streams")]
    EmptyStreamSet { station: String },

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    /// Returns `true` for failures caused by the network or the remote service.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Http { .. })
    }
}

/// Result alias for station discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_count_as_network() {
        let err = Error::Http {
            url: "https://www.iheart.com/live/x-1234/".into(),
            status: 503,
        };
        assert!(err.is_network());
        assert_eq!(
            err.to_string(),
            "https://www.iheart.com/live/x-1234/ returned HTTP 503"
        );
    }

    #[test]
    fn lookup_errors_are_not_network() {
        let err = Error::NoMatchingProvider {
            url: "https://example.com".into(),
        };
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "no provider matches https://example.com");
    }
}
