//! Plugin runner that implements [`StationProvider`] for external binaries.

use std::io::Write;
use std::process::{Command, Stdio};

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::config::PluginConfig;
use crate::error::{Error, Result};
use crate::provider::{Capability, StationProvider};
use crate::station::Station;

/// JSON sent to the plugin on stdin.
#[derive(Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum PluginRequest<'a> {
    Search { query: &'a str, limit: usize },
    Get { url: &'a str },
}

/// Expected stdout for a `search` request.
#[derive(Deserialize)]
struct SearchOutput {
    #[serde(default)]
    stations: Vec<Station>,
}

/// Expected stdout for a `get` request.
#[derive(Deserialize)]
struct GetOutput {
    station: Station,
}

/// Runs an external plugin binary as a [`StationProvider`].
///
/// The plugin receives one request on stdin, e.g.
/// `{"op": "search", "query": "jazz", "limit": 10}` or
/// `{"op": "get", "url": "..."}`, and answers with
/// `{"stations": [...]}` or `{"station": {...}}` on stdout.
/// URL matching uses the configured patterns and never runs the binary.
pub struct PluginProvider {
    config: PluginConfig,
    patterns: Vec<Regex>,
}

impl PluginProvider {
    /// Create a provider from a plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginLoad`] if the binary does not exist or a URL
    /// pattern is not a valid regex.
    pub fn new(config: PluginConfig) -> Result<Self> {
        if !config.binary.exists() {
            return Err(Error::PluginLoad {
                name: config.name.clone(),
                reason: format!("binary not found at {}", config.binary.display()),
            });
        }

        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::PluginLoad {
                    name: config.name.clone(),
                    reason: format!("invalid pattern '{p}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, patterns })
    }

    async fn call<T>(&self, request: &PluginRequest<'_>) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let input = serde_json::to_string(request).map_err(|e| self.failure(e))?;
        let binary = self.config.binary.clone();
        let plugin_name = self.config.name.clone();

        // Spawn the plugin binary in a blocking task since it does process I/O.
        tokio::task::spawn_blocking(move || -> Result<T> {
            let fail = |reason: String| Error::Plugin {
                name: plugin_name.clone(),
                reason,
            };

            let mut child = Command::new(&binary)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| fail(format!("failed to spawn: {e}")))?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin
                    .write_all(input.as_bytes())
                    .map_err(|e| fail(format!("failed to write stdin: {e}")))?;
            }

            let result = child
                .wait_with_output()
                .map_err(|e| fail(format!("failed to wait: {e}")))?;

            if !result.status.success() {
                let stderr = String::from_utf8_lossy(&result.stderr);
                return Err(fail(format!(
                    "exited with {}: {}",
                    result.status,
                    stderr.trim()
                )));
            }

            let stdout = String::from_utf8(result.stdout)
                .map_err(|_| fail("output is not valid UTF-8".to_string()))?;

            serde_json::from_str::<T>(&stdout).map_err(|e| {
                fail(format!(
                    "returned invalid JSON ({e}): {}",
                    output_preview(&stdout)
                ))
            })
        })
        .await
        .map_err(|e| self.failure(format!("task panicked: {e}")))?
    }

    fn failure(&self, reason: impl ToString) -> Error {
        Error::Plugin {
            name: self.config.name.clone(),
            reason: reason.to_string(),
        }
    }
}

/// First 200 characters of plugin output, for error messages.
fn output_preview(stdout: &str) -> String {
    stdout.chars().take(200).collect()
}

#[async_trait]
impl StationProvider for PluginProvider {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities: Vec<Capability> = self
            .config
            .operations
            .iter()
            .filter_map(|op| match op.to_lowercase().as_str() {
                "search" => Some(Capability::Search),
                "get" => Some(Capability::Get),
                _ => None,
            })
            .collect();
        if !self.patterns.is_empty() {
            capabilities.push(Capability::Match);
        }
        capabilities
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Station>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let output: SearchOutput = self.call(&PluginRequest::Search { query, limit }).await?;
        let mut stations = output.stations;
        stations.truncate(limit);
        for station in &mut stations {
            station.provider.clone_from(&self.config.id);
        }
        Ok(stations)
    }

    async fn get(&self, station_url: &str) -> Result<Station> {
        let output: GetOutput = self.call(&PluginRequest::Get { url: station_url }).await?;
        Ok(Station {
            provider: self.config.id.clone(),
            score: 0.0,
            ..output.station
        })
    }

    fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(url))
    }
}
