//! shardplace.toml configuration parser.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::metrics::{MetricKey, StaticMetricProvider};
use crate::types::Node;

/// Strategy used when the config does not name one.
pub const DEFAULT_PLUGIN: &str = "minimize-cores";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardplaceConfig {
    #[serde(default)]
    pub placement: PluginConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Which placement strategy to build, and its strategy-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default = "default_plugin")]
    pub plugin: String,
    pub config: Option<toml::Value>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            plugin: default_plugin(),
            config: None,
        }
    }
}

impl PluginConfig {
    pub fn named(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            config: None,
        }
    }
}

fn default_plugin() -> String {
    DEFAULT_PLUGIN.to_string()
}

/// A node and its last known metrics. A missing value means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub name: String,
    pub cores: Option<u64>,
}

impl ShardplaceConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ShardplaceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if node.name.is_empty() {
                anyhow::bail!("node with empty name");
            }
            if !seen.insert(node.name.as_str()) {
                anyhow::bail!("node {} declared twice", node.name);
            }
        }
        Ok(())
    }

    /// Provider serving the configured node metrics.
    pub fn metric_provider(&self) -> StaticMetricProvider {
        let mut provider = StaticMetricProvider::new();
        for node in &self.nodes {
            if let Some(cores) = node.cores {
                provider.set(Node::new(&node.name), MetricKey::NumCores, cores);
            }
        }
        provider
    }
}
