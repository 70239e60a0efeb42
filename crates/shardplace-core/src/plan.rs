//! Plan construction contract.
//!
//! Strategies build their output through a [`PlanBuilder`] so the
//! surrounding system can substitute its own value types or bookkeeping.

use crate::types::{Node, PlacementPlan, PlacementRequest, ReplicaPlacement, ReplicaType};

/// Constructs placement values. Implementations must be pure.
pub trait PlanBuilder: Send + Sync {
    fn make_replica_placement(
        &self,
        collection: &str,
        shard_name: &str,
        node: &Node,
        replica_type: ReplicaType,
    ) -> ReplicaPlacement;

    fn make_placement_plan(
        &self,
        request: &PlacementRequest,
        placements: Vec<ReplicaPlacement>,
    ) -> PlacementPlan;
}

/// Builds the plain value types from [`crate::types`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPlanBuilder;

impl PlanBuilder for DefaultPlanBuilder {
    fn make_replica_placement(
        &self,
        collection: &str,
        shard_name: &str,
        node: &Node,
        replica_type: ReplicaType,
    ) -> ReplicaPlacement {
        ReplicaPlacement {
            collection: collection.to_string(),
            shard_name: shard_name.to_string(),
            node: node.clone(),
            replica_type,
        }
    }

    fn make_placement_plan(
        &self,
        request: &PlacementRequest,
        placements: Vec<ReplicaPlacement>,
    ) -> PlacementPlan {
        PlacementPlan {
            request: request.clone(),
            placements,
        }
    }
}
