//! External provider plugins.
//!
//! Plugins are external binaries that implement the provider contract over a
//! JSON protocol: one request on stdin, one response on stdout.
//!
//! # Configuration
//!
//! Plugins are declared in the `radioscout` config file:
//!
//! ```toml
//! [[plugins]]
//! id = "somafm"
//! name = "SomaFM"
//! binary = "/usr/local/bin/radioscout-somafm"
//! base_url = "https://somafm.com"
//! patterns = ["^https://somafm\\.com/[a-z0-9]+/?$"]
//! operations = ["search", "get"]
//! ```
//!
//! # Protocol
//!
//! Input (JSON on stdin):
//! ```json
//! {"op": "search", "query": "groove salad", "limit": 10}
//! {"op": "get", "url": "https://somafm.com/groovesalad/"}
//! ```
//!
//! Output (JSON on stdout):
//! ```json
//! {"stations": [{"stationId": "groovesalad", "name": "Groove Salad", "score": 1.0}]}
//! {"station": {"stationId": "groovesalad", "name": "Groove Salad", "streams": {"mp3": "..."}}}
//! ```

pub mod config;
pub mod runner;

pub use config::PluginConfig;
pub use runner::PluginProvider;
