//! Provider discovery and validation.
//!
//! The registry turns a list of [`ProviderFactory`] entries (compiled-in
//! providers plus configured plugins) into validated providers, keyed by id
//! and kept in discovery order.
//!
//! Loading never fails as a whole: a factory that cannot build its provider
//! is skipped with a [`Event::PluginLoadFailed`], and a provider that does
//! not satisfy the contract is skipped with a [`Event::PluginSkipped`].

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::http_client::HttpClient;
use crate::plugin::config::entry_name;
use crate::plugin::{PluginConfig, PluginProvider};
use crate::provider::iheart::{IHeartRadioProvider, IHEART_ID};
use crate::provider::{Capability, StationProvider};

type BuildFn = Box<dyn FnOnce() -> Result<Box<dyn StationProvider>> + Send>;

/// A named, not yet instantiated provider.
pub struct ProviderFactory {
    name: String,
    build: BuildFn,
}

impl ProviderFactory {
    pub fn new<F>(name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn StationProvider>> + Send + 'static,
    {
        Self {
            name: name.into(),
            build: Box::new(build),
        }
    }

    /// Factory for an already constructed provider.
    pub fn from_provider(provider: Box<dyn StationProvider>) -> Self {
        let name = provider.name().to_string();
        Self::new(name, move || Ok(provider))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled-in providers enabled by `config`.
    pub fn builtin(config: &Config, client: &HttpClient) -> Vec<Self> {
        let mut factories = Vec::new();
        if config.is_enabled(IHEART_ID) {
            let client = client.clone();
            let iheart = config.iheart.clone();
            factories.push(Self::new(IHEART_ID, move || {
                let provider = IHeartRadioProvider::with_endpoints(
                    client,
                    iheart.base_url,
                    iheart.search_url,
                );
                Ok(Box::new(provider) as Box<dyn StationProvider>)
            }));
        }
        factories
    }

    /// One factory per `[[plugins]]` entry.
    ///
    /// A malformed entry still gets a factory; building it fails with
    /// [`Error::PluginLoad`].
    pub fn plugins(entries: &[toml::Value]) -> Vec<Self> {
        entries
            .iter()
            .cloned()
            .map(|entry| {
                let name = entry_name(&entry).to_string();
                Self::new(name, move || {
                    let config = PluginConfig::from_entry(&entry)?;
                    Ok(Box::new(PluginProvider::new(config)?) as Box<dyn StationProvider>)
                })
            })
            .collect()
    }
}

/// Check that `provider` satisfies the whole provider contract.
pub fn validate(provider: &dyn StationProvider) -> std::result::Result<(), String> {
    let id = provider.id();
    if id.is_empty() {
        return Err("empty provider id".to_string());
    }
    if id != id.to_lowercase() || id.chars().any(char::is_whitespace) {
        return Err(format!("provider id '{id}' must be lowercase without spaces"));
    }

    let capabilities = provider.capabilities();
    let missing: Vec<String> = Capability::REQUIRED
        .iter()
        .filter(|required| !capabilities.contains(*required))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing operations: {}", missing.join(", ")));
    }

    Ok(())
}

/// Validated providers in discovery order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn StationProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate and validate every factory, skipping the bad ones.
    pub fn load(factories: impl IntoIterator<Item = ProviderFactory>, sink: &dyn EventSink) -> Self {
        let mut registry = Self::new();

        for factory in factories {
            let ProviderFactory { name, build } = factory;
            let provider = match build() {
                Ok(provider) => provider,
                Err(e) => {
                    let reason = match e {
                        Error::PluginLoad { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    sink.emit(&Event::PluginLoadFailed { name, reason });
                    continue;
                }
            };

            match registry.register(provider) {
                Ok(id) => sink.emit(&Event::ProviderLoaded { id }),
                Err(Error::PluginInvalid { reason, .. }) => {
                    sink.emit(&Event::PluginSkipped { name, reason });
                }
                Err(other) => sink.emit(&Event::PluginSkipped {
                    name,
                    reason: other.to_string(),
                }),
            }
        }

        registry
    }

    /// Built-in providers plus configured plugins.
    pub fn from_config(config: &Config, sink: &dyn EventSink) -> Result<Self> {
        let client = HttpClient::with_settings(&config.user_agent, config.timeout())?;
        let factories = ProviderFactory::builtin(config, &client)
            .into_iter()
            .chain(ProviderFactory::plugins(&config.plugins));
        Ok(Self::load(factories, sink))
    }

    /// Validate and add a provider, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PluginInvalid`] if the provider breaks the contract or
    /// its id is already registered.
    pub fn register(&mut self, provider: Box<dyn StationProvider>) -> Result<String> {
        let reason = match validate(provider.as_ref()) {
            Err(reason) => Some(reason),
            Ok(()) if self.get(provider.id()).is_some() => {
                Some(format!("duplicate provider id '{}'", provider.id()))
            }
            Ok(()) => None,
        };
        if let Some(reason) = reason {
            return Err(Error::PluginInvalid {
                name: provider.name().to_string(),
                reason,
            });
        }

        let id = provider.id().to_string();
        self.providers.push(provider);
        Ok(id)
    }

    /// Get a provider by ID
    pub fn get(&self, id: &str) -> Option<&dyn StationProvider> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
    }

    /// Providers in discovery order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn StationProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    /// List all provider IDs
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::station::Station;

    struct StubProvider {
        id: &'static str,
        capabilities: Vec<Capability>,
    }

    impl StubProvider {
        fn boxed(id: &'static str, capabilities: &[Capability]) -> Box<dyn StationProvider> {
            Box::new(Self {
                id,
                capabilities: capabilities.to_vec(),
            })
        }
    }

    #[async_trait]
    impl StationProvider for StubProvider {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn base_url(&self) -> &str {
            "https://stub.example.com"
        }

        fn capabilities(&self) -> Vec<Capability> {
            self.capabilities.clone()
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Station>> {
            Ok(Vec::new())
        }

        async fn get(&self, _station_url: &str) -> Result<Station> {
            Ok(Station::new(self.id, 1, "Stub"))
        }

        fn matches(&self, _url: &str) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<Event>>);

    impl EventSink for RecordingSink {
        fn emit(&self, event: &Event) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    impl RecordingSink {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn keeps_valid_and_skips_invalid_provider() {
        let sink = RecordingSink::default();
        let registry = ProviderRegistry::load(
            [
                ProviderFactory::from_provider(StubProvider::boxed("good", &Capability::REQUIRED)),
                ProviderFactory::from_provider(StubProvider::boxed(
                    "noget",
                    &[Capability::Search, Capability::Match],
                )),
            ],
            &sink,
        );

        assert_eq!(registry.ids(), vec!["good"]);
        let events = sink.events();
        assert!(events.contains(&Event::ProviderLoaded { id: "good".into() }));
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PluginSkipped { name, reason } if name == "noget" && reason.contains("get")
        )));
    }

    #[test]
    fn load_failure_is_logged_and_skipped() {
        let sink = RecordingSink::default();
        let registry = ProviderRegistry::load(
            [
                ProviderFactory::new("broken", || {
                    Err(Error::PluginLoad {
                        name: "broken".into(),
                        reason: "binary not found".into(),
                    })
                }),
                ProviderFactory::from_provider(StubProvider::boxed("good", &Capability::REQUIRED)),
            ],
            &sink,
        );

        assert_eq!(registry.len(), 1);
        assert!(sink.events().contains(&Event::PluginLoadFailed {
            name: "broken".into(),
            reason: "binary not found".into(),
        }));
    }

    #[test]
    fn all_bad_plugins_give_empty_registry() {
        let registry = ProviderRegistry::load(
            [ProviderFactory::from_provider(StubProvider::boxed("nothing", &[]))],
            &RecordingSink::default(),
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn rejects_non_lowercase_and_empty_ids() {
        assert!(validate(StubProvider::boxed("Upper", &Capability::REQUIRED).as_ref()).is_err());
        assert!(validate(StubProvider::boxed("", &Capability::REQUIRED).as_ref()).is_err());
        assert!(validate(StubProvider::boxed("two words", &Capability::REQUIRED).as_ref()).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(StubProvider::boxed("dup", &Capability::REQUIRED))
            .unwrap();
        let err = registry
            .register(StubProvider::boxed("dup", &Capability::REQUIRED))
            .unwrap_err();
        assert!(matches!(err, Error::PluginInvalid { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn keeps_discovery_order() {
        let registry = ProviderRegistry::load(
            ["c", "a", "b"].map(|id| {
                ProviderFactory::from_provider(StubProvider::boxed(id, &Capability::REQUIRED))
            }),
            &RecordingSink::default(),
        );
        assert_eq!(registry.ids(), vec!["c", "a", "b"]);
        assert_eq!(registry.get("a").unwrap().id(), "a");
        assert!(registry.get("z").is_none());
    }

    #[test]
    fn factories_are_named_before_building() {
        let client = HttpClient::new().unwrap();
        let builtin = ProviderFactory::builtin(&Config::default(), &client);
        assert_eq!(builtin.len(), 1);
        assert_eq!(builtin[0].name(), "iheartradio");

        let disabled = Config {
            providers: Some(Vec::new()),
            ..Config::default()
        };
        assert!(ProviderFactory::builtin(&disabled, &client).is_empty());
    }

    #[test]
    fn default_config_registers_iheart() {
        let registry = ProviderRegistry::from_config(&Config::default(), &RecordingSink::default())
            .unwrap();
        assert_eq!(registry.ids(), vec!["iheartradio"]);
    }

    fn config_with_plugins(plugins: &str) -> Config {
        toml::from_str(plugins).unwrap()
    }

    #[test]
    fn missing_plugin_binary_does_not_block_builtins() {
        let config = config_with_plugins(
            r#"
[[plugins]]
id = "ghost"
name = "Ghost"
binary = "/nonexistent/radioscout-ghost"
patterns = [".*"]
operations = ["search", "get"]
"#,
        );

        let sink = RecordingSink::default();
        let registry = ProviderRegistry::from_config(&config, &sink).unwrap();

        assert_eq!(registry.ids(), vec!["iheartradio"]);
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, Event::PluginLoadFailed { name, .. } if name == "Ghost")));
    }

    #[test]
    fn malformed_plugin_entry_is_skipped() {
        let config = config_with_plugins(
            r#"
[[plugins]]
id = "nobinary"
name = "No Binary"

[[plugins]]
id = "typo"
name = "Typo"
binary = "/bin/sh"
patterns = "not-a-list"
"#,
        );

        let sink = RecordingSink::default();
        let registry = ProviderRegistry::from_config(&config, &sink).unwrap();

        assert_eq!(registry.ids(), vec!["iheartradio"]);
        let failed: Vec<String> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::PluginLoadFailed { name, reason } => {
                    assert!(reason.contains("invalid plugin entry"));
                    Some(name)
                }
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec!["No Binary", "Typo"]);
    }
}
