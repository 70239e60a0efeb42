//! shardplace-core — shared model for replica placement.
//!
//! Holds the request/plan value types, the two collaborator contracts a
//! strategy relies on ([`MetricProvider`] for node metrics and
//! [`PlanBuilder`] for output values), the error type, and config parsing.

pub mod config;
pub mod error;
pub mod metrics;
pub mod plan;
pub mod types;

pub use config::{NodeConfig, PluginConfig, ShardplaceConfig};
pub use error::{PlacementError, PlacementErrorKind, PlacementResult};
pub use metrics::{MetricKey, MetricProvider, MetricSnapshot, StaticMetricProvider};
pub use plan::{DefaultPlanBuilder, PlanBuilder};
pub use types::*;
