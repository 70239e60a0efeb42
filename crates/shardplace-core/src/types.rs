//! Value and request model shared by every placement strategy.
//!
//! Requests and plans are immutable once built. Strategies read
//! [`PlacementRequest`]s and hand back one [`PlacementPlan`] per request;
//! applying a plan to the real cluster is the caller's business.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, PlacementResult};

// ── Node ───────────────────────────────────────────────────────────

/// A cluster node able to host replicas, identified by an opaque name.
///
/// Ordering is lexical on the name. Strategies rely on it as the
/// tie-break between nodes that are otherwise equally loaded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Node {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ── Replica types ──────────────────────────────────────────────────

/// Kind of replica to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplicaType {
    /// Near-real-time: indexes locally and is searchable immediately.
    Nrt,
    /// Keeps a transaction log, replicates the index from the leader.
    Tlog,
    /// Read-only, pulls the index from the leader.
    Pull,
}

impl ReplicaType {
    /// Canonical processing order. Earlier types get the least loaded nodes.
    pub const ALL: [ReplicaType; 3] = [ReplicaType::Nrt, ReplicaType::Tlog, ReplicaType::Pull];

    pub fn label(&self) -> &'static str {
        match self {
            ReplicaType::Nrt => "NRT",
            ReplicaType::Tlog => "TLOG",
            ReplicaType::Pull => "PULL",
        }
    }
}

impl fmt::Display for ReplicaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of replicas to create per type, applied to every shard of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaCounts {
    pub nrt: u32,
    pub tlog: u32,
    pub pull: u32,
}

impl ReplicaCounts {
    pub fn new(nrt: u32, tlog: u32, pull: u32) -> Self {
        Self { nrt, tlog, pull }
    }

    pub fn get(&self, replica_type: ReplicaType) -> u32 {
        match replica_type {
            ReplicaType::Nrt => self.nrt,
            ReplicaType::Tlog => self.tlog,
            ReplicaType::Pull => self.pull,
        }
    }

    /// Replicas needed per shard, across all types.
    pub fn total(&self) -> u64 {
        ReplicaType::ALL
            .iter()
            .map(|rt| u64::from(self.get(*rt)))
            .sum()
    }

    /// `(type, count)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ReplicaType, u32)> + '_ {
        ReplicaType::ALL.into_iter().map(move |rt| (rt, self.get(rt)))
    }
}

// ── Shards ─────────────────────────────────────────────────────────

/// A shard, identified by its collection and its name within it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardId {
    pub collection: String,
    pub shard_name: String,
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.shard_name)
    }
}

// ── Requests ───────────────────────────────────────────────────────

/// A request to create replicas for a set of shards of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub collection: String,
    /// Shard names in processing order, without duplicates.
    pub shard_names: Vec<String>,
    /// Candidate nodes for the new replicas.
    pub target_nodes: BTreeSet<Node>,
    /// Replicas to create for each shard.
    #[serde(default)]
    pub replicas: ReplicaCounts,
}

impl PlacementRequest {
    /// Build a request. Repeated shard names are dropped, keeping the
    /// position of the first occurrence.
    pub fn new<S, N>(
        collection: impl Into<String>,
        shard_names: impl IntoIterator<Item = S>,
        target_nodes: impl IntoIterator<Item = N>,
        replicas: ReplicaCounts,
    ) -> Self
    where
        S: Into<String>,
        N: Into<Node>,
    {
        let mut seen = HashSet::new();
        let shard_names = shard_names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();

        Self {
            collection: collection.into(),
            shard_names,
            target_nodes: target_nodes.into_iter().map(Into::into).collect(),
            replicas,
        }
    }

    pub fn replicas_per_shard(&self) -> u64 {
        self.replicas.total()
    }

    /// Total placements a satisfied request yields.
    pub fn expected_placements(&self) -> u64 {
        self.replicas_per_shard() * self.shard_names.len() as u64
    }

    pub fn shard_ids(&self) -> impl Iterator<Item = ShardId> + '_ {
        self.shard_names.iter().map(move |name| ShardId {
            collection: self.collection.clone(),
            shard_name: name.clone(),
        })
    }

    /// Reject requests that would break per-shard node uniqueness.
    ///
    /// Requests with no shards or no replicas are valid and yield empty
    /// plans. Capacity (enough target nodes) is a strategy concern.
    pub fn validate(&self) -> PlacementResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = self.shard_names.iter().find(|n| !seen.insert(*n)) {
            return Err(PlacementError::InvalidRequest(format!(
                "collection {}: shard {dup} listed twice",
                self.collection
            )));
        }
        Ok(())
    }
}

// ── Placements & plans ─────────────────────────────────────────────

/// One replica of one shard assigned to one node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplicaPlacement {
    pub collection: String,
    pub shard_name: String,
    pub node: Node,
    pub replica_type: ReplicaType,
}

impl fmt::Display for ReplicaPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} -> {} ({})",
            self.collection, self.shard_name, self.node, self.replica_type
        )
    }
}

/// All placements computed for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub request: PlacementRequest,
    /// Placements in emission order: shard, then replica type, then node rank.
    pub placements: Vec<ReplicaPlacement>,
}

impl PlacementPlan {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placements_for_shard<'a>(
        &'a self,
        shard_name: &'a str,
    ) -> impl Iterator<Item = &'a ReplicaPlacement> + 'a {
        self.placements
            .iter()
            .filter(move |p| p.shard_name == shard_name)
    }

    pub fn nodes_for_shard(&self, shard_name: &str) -> Vec<&Node> {
        self.placements
            .iter()
            .filter(|p| p.shard_name == shard_name)
            .map(|p| &p.node)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_order_is_lexical() {
        let mut nodes = vec![Node::new("b:8983"), Node::new("a:8983"), Node::new("a:7574")];
        nodes.sort();
        let names: Vec<_> = nodes.iter().map(Node::name).collect();
        assert_eq!(names, vec!["a:7574", "a:8983", "b:8983"]);
    }

    #[test]
    fn replica_counts_total_and_order() {
        let counts = ReplicaCounts::new(2, 1, 3);
        assert_eq!(counts.total(), 6);

        let order: Vec<_> = counts.iter().collect();
        assert_eq!(
            order,
            vec![
                (ReplicaType::Nrt, 2),
                (ReplicaType::Tlog, 1),
                (ReplicaType::Pull, 3),
            ]
        );
    }

    #[test]
    fn request_drops_duplicate_shards_keeping_first_position() {
        let req = PlacementRequest::new(
            "books",
            ["s2", "s1", "s2", "s3", "s1"],
            ["n1"],
            ReplicaCounts::new(1, 0, 0),
        );
        assert_eq!(req.shard_names, vec!["s2", "s1", "s3"]);
        assert_eq!(req.expected_placements(), 3);
    }

    #[test]
    fn validate_accepts_zero_replicas() {
        let req = PlacementRequest::new("books", ["s1"], ["n1"], ReplicaCounts::default());
        assert!(req.validate().is_ok());
        assert_eq!(req.expected_placements(), 0);
    }

    #[test]
    fn validate_rejects_duplicates_in_deserialized_request() {
        let json = r#"{
            "collection": "books",
            "shard_names": ["s1", "s1"],
            "target_nodes": ["n1", "n2"],
            "replicas": { "nrt": 1 }
        }"#;
        let req: PlacementRequest = serde_json::from_str(json).unwrap();
        let err = req.validate().unwrap_err();
        assert!(matches!(err, PlacementError::InvalidRequest(_)));
    }

    #[test]
    fn validate_accepts_request_without_shards() {
        let req = PlacementRequest::new(
            "books",
            Vec::<String>::new(),
            ["n1"],
            ReplicaCounts::new(1, 0, 0),
        );
        assert!(req.validate().is_ok());
        assert_eq!(req.expected_placements(), 0);
    }

    #[test]
    fn replica_type_serializes_uppercase() {
        let json = serde_json::to_string(&ReplicaType::Tlog).unwrap();
        assert_eq!(json, "\"TLOG\"");
        let rt: ReplicaType = serde_json::from_str("\"PULL\"").unwrap();
        assert_eq!(rt, ReplicaType::Pull);
    }

    #[test]
    fn plan_groups_by_shard() {
        let req = PlacementRequest::new(
            "books",
            ["s1", "s2"],
            ["n1", "n2"],
            ReplicaCounts::new(1, 0, 0),
        );
        let placement = |shard: &str, node: &str| ReplicaPlacement {
            collection: "books".to_string(),
            shard_name: shard.to_string(),
            node: Node::new(node),
            replica_type: ReplicaType::Nrt,
        };
        let plan = PlacementPlan {
            request: req,
            placements: vec![placement("s1", "n1"), placement("s2", "n2")],
        };

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.nodes_for_shard("s2"), vec![&Node::new("n2")]);
        assert_eq!(
            plan.placements[0].to_string(),
            "books/s1 -> n1 (NRT)"
        );
    }

    #[test]
    fn shard_nodes_outlive_the_queried_name() {
        let req = PlacementRequest::new("books", ["s1"], ["n1"], ReplicaCounts::new(1, 0, 0));
        let plan = PlacementPlan {
            placements: vec![ReplicaPlacement {
                collection: "books".to_string(),
                shard_name: "s1".to_string(),
                node: Node::new("n1"),
                replica_type: ReplicaType::Nrt,
            }],
            request: req,
        };

        let nodes = {
            let name = String::from("s1");
            plan.nodes_for_shard(&name)
        };

        assert_eq!(nodes, vec![&Node::new("n1")]);
    }
}
