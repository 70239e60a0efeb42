//! Core-count bookkeeping for a single placement computation.
//!
//! [`CoreProjection`] holds the projected core count of every node seen in
//! a batch. It starts from the fetched metrics and grows as replicas are
//! assigned, so later shards and later requests see the load added by
//! earlier ones. [`CoreCountIndex`] ranks one request's target nodes by
//! that projection.
//!
//! Both live only for the duration of one call.

use std::collections::{BTreeMap, BTreeSet};

use shardplace_core::{MetricKey, MetricSnapshot, Node, PlacementError, PlacementResult};

/// Projected core count per node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProjection {
    counts: BTreeMap<Node, u64>,
}

impl CoreProjection {
    /// Seed from a metric snapshot.
    ///
    /// Fails on the first node (in name order) without a core count.
    pub fn from_snapshot(nodes: &BTreeSet<Node>, snapshot: &MetricSnapshot) -> PlacementResult<Self> {
        let mut counts = BTreeMap::new();
        for node in nodes {
            let cores = snapshot
                .get(node, MetricKey::NumCores)
                .ok_or_else(|| PlacementError::MetricUnavailable {
                    node: node.clone(),
                    metric: MetricKey::NumCores,
                })?;
            counts.insert(node.clone(), cores);
        }
        Ok(Self { counts })
    }

    pub fn get(&self, node: &Node) -> Option<u64> {
        self.counts.get(node).copied()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.counts.contains_key(node)
    }

    /// Add one core to `node`, returning its new count. Saturates at `u64::MAX`.
    pub fn increment(&mut self, node: &Node) -> Option<u64> {
        let count = self.counts.get_mut(node)?;
        *count = count.saturating_add(1);
        Some(*count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<N: Into<Node>> FromIterator<(N, u64)> for CoreProjection {
    fn from_iter<I: IntoIterator<Item = (N, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().map(|(n, c)| (n.into(), c)).collect(),
        }
    }
}

/// Nodes bucketed by projected core count.
///
/// Iteration is ascending by count, then by node name within a bucket.
/// That name order is the tie-break between equally loaded nodes.
#[derive(Debug, Clone, Default)]
pub struct CoreCountIndex {
    by_count: BTreeMap<u64, BTreeSet<Node>>,
}

impl CoreCountIndex {
    /// Index `nodes` by their current count in `projection`.
    /// Nodes unknown to the projection are skipped.
    pub fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>, projection: &CoreProjection) -> Self {
        let mut by_count: BTreeMap<u64, BTreeSet<Node>> = BTreeMap::new();
        for node in nodes {
            if let Some(count) = projection.get(node) {
                by_count.entry(count).or_default().insert(node.clone());
            }
        }
        Self { by_count }
    }

    /// The `n` least loaded nodes with their counts, lowest first.
    pub fn lowest(&self, n: usize) -> Vec<(u64, Node)> {
        self.by_count
            .iter()
            .flat_map(|(count, nodes)| nodes.iter().map(move |node| (*count, node.clone())))
            .take(n)
            .collect()
    }

    /// Move `node` from the `count` bucket to `count + 1`, saturating like
    /// [`CoreProjection::increment`].
    pub fn bump(&mut self, count: u64, node: &Node) {
        let Some(bucket) = self.by_count.get_mut(&count) else {
            return;
        };
        if !bucket.remove(node) {
            return;
        }
        if bucket.is_empty() {
            self.by_count.remove(&count);
        }
        self.by_count
            .entry(count.saturating_add(1))
            .or_default()
            .insert(node.clone());
    }

    pub fn len(&self) -> usize {
        self.by_count.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_count.is_empty()
    }
}
