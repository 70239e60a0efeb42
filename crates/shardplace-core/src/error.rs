//! Error types for placement computations.

use thiserror::Error;

use crate::metrics::MetricKey;
use crate::types::Node;

/// Result type alias for placement operations.
pub type PlacementResult<T> = Result<T, PlacementError>;

/// Errors that abort a placement computation.
///
/// Any of these aborts the whole batch. No partial plans are returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error(
        "cluster size too small for collection {collection}: {target_nodes} target nodes, \
         {replicas_per_shard} replicas per shard"
    )]
    Infeasible {
        collection: String,
        target_nodes: usize,
        replicas_per_shard: u64,
    },

    #[error("can't get {metric} for node {node}")]
    MetricUnavailable { node: Node, metric: MetricKey },

    #[error("unknown placement plugin: {0}")]
    UnknownPlugin(String),

    #[error("invalid config for plugin {plugin}: {reason}")]
    InvalidConfig { plugin: String, reason: String },

    #[error("invalid placement request: {0}")]
    InvalidRequest(String),
}

/// Coarse classification of a [`PlacementError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementErrorKind {
    Infeasible,
    MetricUnavailable,
    Configuration,
    InvalidRequest,
}

impl PlacementError {
    pub fn kind(&self) -> PlacementErrorKind {
        match self {
            PlacementError::Infeasible { .. } => PlacementErrorKind::Infeasible,
            PlacementError::MetricUnavailable { .. } => PlacementErrorKind::MetricUnavailable,
            PlacementError::UnknownPlugin(_) | PlacementError::InvalidConfig { .. } => {
                PlacementErrorKind::Configuration
            }
            PlacementError::InvalidRequest(_) => PlacementErrorKind::InvalidRequest,
        }
    }
}
