//! Plugin entries from the `[[plugins]]` tables of the config file.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Configuration for a single external provider plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Provider id the plugin registers under (unique, lowercase).
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Path to the plugin binary.
    pub binary: PathBuf,
    /// Base URL of the directory the plugin talks to.
    #[serde(default)]
    pub base_url: String,
    /// URL regex patterns for station pages this plugin handles.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Operations the plugin binary implements (`"search"`, `"get"`).
    #[serde(default)]
    pub operations: Vec<String>,
}

impl PluginConfig {
    /// Read one `[[plugins]]` table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginLoad`] if required fields are missing or mistyped.
    pub fn from_entry(entry: &toml::Value) -> Result<Self> {
        entry.clone().try_into().map_err(|e: toml::de::Error| Error::PluginLoad {
            name: entry_name(entry).to_string(),
            reason: format!("invalid plugin entry: {}", e.message()),
        })
    }
}

/// Best-effort name of a plugin entry, used when the entry itself is broken.
pub fn entry_name(entry: &toml::Value) -> &str {
    entry
        .get("name")
        .or_else(|| entry.get("id"))
        .and_then(toml::Value::as_str)
        .unwrap_or("<unnamed plugin>")
}
