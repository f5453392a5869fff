//! Plant registry.
//!
//! Maps a model name from `PlantConfig::model` to the factory that builds
//! it. Constructed at startup and passed by value; no global state.

use ladrc_common::prelude::{PlantAdapter, PlantConfig, PlantError, PlantFactory};
use std::collections::HashMap;

use crate::drivers::register_all_plants;

/// Registry of available plant models.
pub struct PlantRegistry {
    factories: HashMap<&'static str, PlantFactory>,
}

impl PlantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in plant model.
    pub fn with_builtin_plants() -> Self {
        let mut registry = Self::new();
        register_all_plants(&mut registry);
        registry
    }

    /// Register a plant factory.
    ///
    /// # Panics
    /// Panics if a plant with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: PlantFactory) {
        if self.factories.contains_key(name) {
            panic!("Plant '{name}' is already registered");
        }
        self.factories.insert(name, factory);
    }

    /// Get a plant factory by name.
    pub fn get_factory(&self, name: &str) -> Option<PlantFactory> {
        self.factories.get(name).copied()
    }

    /// Validate `config` and build the plant it names.
    ///
    /// # Errors
    /// - `PlantError::InvalidConfig` if the parameters fail validation.
    /// - `PlantError::ModelNotFound` if `config.model` is not registered.
    pub fn create_plant(&self, config: &PlantConfig) -> Result<Box<dyn PlantAdapter>, PlantError> {
        config.validate()?;
        let factory = self
            .get_factory(&config.model)
            .ok_or_else(|| PlantError::ModelNotFound(config.model.clone()))?;
        Ok(factory(config))
    }

    /// List all registered plant names.
    pub fn list_plants(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl Default for PlantRegistry {
    fn default() -> Self {
        Self::with_builtin_plants()
    }
}
