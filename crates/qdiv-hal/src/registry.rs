//! Backend registry.
//!
//! The [`BackendRegistry`] maps backend names to factories so that a backend
//! can be chosen from configuration at runtime.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Factory function type for registered backends.
type Factory = Box<dyn Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync>;

struct Entry {
    description: String,
    factory: Factory,
}

/// Name-indexed collection of backend factories.
pub struct BackendRegistry {
    entries: FxHashMap<String, Entry>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Register a backend type that can build itself from configuration.
    pub fn register<B>(&mut self, name: impl Into<String>, description: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        self.register_factory(name, description, |config| {
            let backend = B::from_config(config)?;
            Ok(Box::new(backend) as Box<dyn Backend>)
        });
    }

    /// Register a backend with a custom constructor.
    pub fn register_factory(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: impl Fn(BackendConfig) -> HalResult<Box<dyn Backend>> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!("Registering backend: {}", name);
        self.entries.insert(
            name,
            Entry {
                description: description.into(),
                factory: Box::new(factory),
            },
        );
    }

    /// Create the backend named by `config.name`.
    pub fn create(&self, config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        match self.entries.get(&config.name) {
            Some(entry) => (entry.factory)(config),
            None => Err(HalError::UnknownBackend(format!(
                "'{}' (available: {})",
                config.name,
                self.available_backends().join(", ")
            ))),
        }
    }

    /// List all registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered backends with their descriptions, sorted by name.
    pub fn describe(&self) -> Vec<(&str, &str)> {
        let mut described: Vec<_> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description.as_str()))
            .collect();
        described.sort();
        described
    }

    /// Check if a backend is registered by name.
    pub fn has_backend(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable(_config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        Err(HalError::BackendUnavailable("test only".into()))
    }

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        assert!(!registry.has_backend("simulator"));
    }

    #[test]
    fn test_register_factory() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("test", "always fails", unavailable);

        assert!(registry.has_backend("test"));
        assert_eq!(registry.describe(), vec![("test", "always fails")]);
        assert!(matches!(
            registry.create(BackendConfig::new("test")),
            Err(HalError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_create_unknown_backend_lists_known() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("simulator", "", unavailable);

        match registry.create(BackendConfig::new("nonexistent")) {
            Err(HalError::UnknownBackend(msg)) => {
                assert!(msg.contains("nonexistent"));
                assert!(msg.contains("simulator"));
            }
            Err(other) => panic!("expected UnknownBackend, got {other}"),
            Ok(_) => panic!("expected UnknownBackend"),
        }
    }

    #[test]
    fn test_available_backends_sorted() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("zebra", "", unavailable);
        registry.register_factory("alpha", "", unavailable);

        assert_eq!(registry.available_backends(), vec!["alpha", "zebra"]);
    }
}
