//! Node metric contract.
//!
//! Placement strategies never talk to nodes directly. They declare the
//! metrics they need, ask the provider to fetch them for a node set in one
//! batch, then read an immutable [`MetricSnapshot`]. A missing entry in
//! the snapshot means the value could not be retrieved.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Node;

/// Node-level metrics a strategy may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Number of cores (one per hosted replica) on the node.
    NumCores,
}

impl MetricKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::NumCores => "num_cores",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable result of a batched metric fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    values: HashMap<(Node, MetricKey), u64>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node, key: MetricKey, value: u64) {
        self.values.insert((node, key), value);
    }

    /// `None` when the provider could not retrieve the value.
    pub fn get(&self, node: &Node, key: MetricKey) -> Option<u64> {
        self.values.get(&(node.clone(), key)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Supplies node metrics to placement strategies.
///
/// Call order is `declare_interest` (one or more times), then `fetch`, then
/// `snapshot`.
pub trait MetricProvider {
    /// Register a metric the next [`fetch`](Self::fetch) must retrieve.
    fn declare_interest(&mut self, key: MetricKey);

    /// Retrieve every declared metric for `nodes` in a single round-trip.
    fn fetch(&mut self, nodes: &BTreeSet<Node>);

    /// Values retrieved by the last fetch.
    fn snapshot(&self) -> MetricSnapshot;
}

/// In-memory provider backed by a fixed table of node metrics.
///
/// Nodes or metrics missing from the table are absent from the snapshot,
/// exactly as an unreachable node would be.
#[derive(Debug, Clone, Default)]
pub struct StaticMetricProvider {
    table: BTreeMap<Node, BTreeMap<MetricKey, u64>>,
    interests: BTreeSet<MetricKey>,
    fetched: MetricSnapshot,
    fetch_count: usize,
}

impl StaticMetricProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from `(node, core count)` pairs.
    pub fn with_cores<N, I>(cores: I) -> Self
    where
        N: Into<Node>,
        I: IntoIterator<Item = (N, u64)>,
    {
        let mut provider = Self::new();
        for (node, count) in cores {
            provider.set(node.into(), MetricKey::NumCores, count);
        }
        provider
    }

    pub fn set(&mut self, node: Node, key: MetricKey, value: u64) {
        self.table.entry(node).or_default().insert(key, value);
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

impl MetricProvider for StaticMetricProvider {
    fn declare_interest(&mut self, key: MetricKey) {
        self.interests.insert(key);
    }

    fn fetch(&mut self, nodes: &BTreeSet<Node>) {
        let mut snapshot = MetricSnapshot::new();
        for node in nodes {
            let Some(values) = self.table.get(node) else {
                continue;
            };
            for key in &self.interests {
                if let Some(value) = values.get(key) {
                    snapshot.insert(node.clone(), *key, *value);
                }
            }
        }
        self.fetch_count += 1;
        debug!(
            nodes = nodes.len(),
            values = snapshot.len(),
            "static metrics fetched"
        );
        self.fetched = snapshot;
    }

    fn snapshot(&self) -> MetricSnapshot {
        self.fetched.clone()
    }
}
