//! Configuration loaded from `~/.config/radioscout/config.toml`.
//!
//! ```toml
//! default_limit = 10
//! timeout_secs = 30
//! providers = ["iheartradio"]
//!
//! [iheart]
//! base_url = "https://www.iheart.com"
//! search_url = "https://us.api.iheart.com/api/v3/search/all"
//!
//! [[plugins]]
//! id = "somafm"
//! name = "SomaFM"
//! binary = "/usr/local/bin/radioscout-somafm"
//! patterns = ["^https://somafm\\.com/[a-z0-9]+/?$"]
//! operations = ["search", "get"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http_client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::provider::iheart::{IHEART_BASE_URL, IHEART_SEARCH_URL};

/// Default number of results requested from each provider.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Results requested from each provider when no limit is given.
    pub default_limit: usize,
    /// Request timeout for provider HTTP calls.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Built-in providers to enable. `None` enables all of them.
    pub providers: Option<Vec<String>>,
    pub iheart: IHeartConfig,
    /// Raw `[[plugins]]` tables. Each entry is checked when its plugin is
    /// loaded, so one broken entry only skips that plugin.
    pub plugins: Vec<toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            providers: None,
            iheart: IHeartConfig::default(),
            plugins: Vec::new(),
        }
    }
}

/// Endpoints of the built-in iHeartRadio provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IHeartConfig {
    pub base_url: String,
    pub search_url: String,
}

impl Default for IHeartConfig {
    fn default() -> Self {
        Self {
            base_url: IHEART_BASE_URL.to_string(),
            search_url: IHEART_SEARCH_URL.to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, see [`config_path`].
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load from `path`.
    ///
    /// Returns the defaults if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::parse(&content).map_err(|reason| Error::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether the built-in provider `id` is enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.providers
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|enabled| enabled == id))
    }
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("radioscout")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.iheart.base_url, "https://www.iheart.com");
        assert!(config.plugins.is_empty());
        assert!(config.is_enabled("iheartradio"));
    }

    #[test]
    fn provider_allow_list() {
        let config = Config::parse(r#"providers = ["somafm"]"#).unwrap();
        assert!(!config.is_enabled("iheartradio"));
        assert!(config.is_enabled("somafm"));
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let config = Config::parse(
            r#"
default_limit = 3

[iheart]
search_url = "http://localhost:8080/search"

[[plugins]]
id = "local"
name = "Local"
binary = "/usr/bin/local-radio"
"#,
        )
        .unwrap();
        assert_eq!(config.default_limit, 3);
        assert_eq!(config.iheart.base_url, "https://www.iheart.com");
        assert_eq!(config.iheart.search_url, "http://localhost:8080/search");
        assert_eq!(config.plugins.len(), 1);
    }

    #[test]
    fn incomplete_plugin_entry_does_not_reject_config() {
        let config = Config::parse(
            r#"
default_limit = 5

[[plugins]]
id = "x"
name = "X"
"#,
        )
        .unwrap();
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.plugins.len(), 1);
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/radioscout/config.toml")).unwrap();
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("radioscout-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "default_limit = \"many\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn config_path_ends_in_app_dir() {
        assert!(config_path().ends_with("radioscout/config.toml"));
    }
}
