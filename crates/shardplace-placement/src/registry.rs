//! Strategy lookup by name.
//!
//! Maps the `plugin` name from a [`PluginConfig`] to a registered
//! [`PlacementPluginFactory`], deserializing the optional config table into
//! that factory's own `Config` type.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use shardplace_core::{PlacementError, PlacementResult, PluginConfig};

use crate::minimize_cores::MinimizeCoresPlacementFactory;
use crate::plugin::{PlacementPlugin, PlacementPluginFactory};

type Constructor =
    Box<dyn Fn(Option<&toml::Value>) -> PlacementResult<Arc<dyn PlacementPlugin>> + Send + Sync>;

/// Registered placement strategies.
pub struct PluginRegistry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry holding every built-in strategy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<MinimizeCoresPlacementFactory>();
        registry
    }

    /// Register `F` under `F::NAME`, replacing any previous entry.
    pub fn register<F: PlacementPluginFactory>(&mut self) -> &mut Self {
        let constructor: Constructor = Box::new(|raw: Option<&toml::Value>| {
            let config = match raw {
                Some(value) => F::Config::deserialize(value.clone()).map_err(|e| {
                    PlacementError::InvalidConfig {
                        plugin: F::NAME.to_string(),
                        reason: e.to_string(),
                    }
                })?,
                None => F::Config::default(),
            };
            Ok(F::new(config).create_plugin_instance())
        });
        self.constructors.insert(F::NAME, constructor);
        debug!(plugin = F::NAME, "placement plugin registered");
        self
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.constructors.keys().copied().collect()
    }

    /// Build the plugin named by `config`.
    pub fn create(&self, config: &PluginConfig) -> PlacementResult<Arc<dyn PlacementPlugin>> {
        let constructor = self
            .constructors
            .get(config.plugin.as_str())
            .ok_or_else(|| PlacementError::UnknownPlugin(config.plugin.clone()))?;
        let plugin = constructor(config.config.as_ref())?;
        info!(plugin = %config.plugin, "placement plugin created");
        Ok(plugin)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
