//! Core-minimizing placement strategy.
//!
//! Places every replica on the target nodes hosting the fewest cores,
//! never putting two replicas of the same shard on one node. Selection is
//! greedy and sequential: after each shard the chosen nodes are charged
//! one core each, so the next shard, and the next request of the same
//! batch, sees the added load. The result balances the whole batch but
//! makes no claim of global optimality.
//!
//! Equally loaded nodes are ranked by name.

use std::collections::BTreeSet;
use std::iter;
use std::sync::Arc;

use tracing::{debug, info, warn};

use shardplace_core::{
    MetricKey, Node, PlacementError, PlacementPlan, PlacementRequest, PlacementResult, PlanBuilder,
};

use crate::cores::{CoreCountIndex, CoreProjection};
use crate::plugin::{NoConfig, PlacementContext, PlacementPlugin, PlacementPluginFactory};

/// Factory for [`MinimizeCoresPlacementPlugin`]. Takes no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimizeCoresPlacementFactory;

impl PlacementPluginFactory for MinimizeCoresPlacementFactory {
    const NAME: &'static str = "minimize-cores";

    type Config = NoConfig;

    fn new(_config: NoConfig) -> Self {
        Self
    }

    fn create_plugin_instance(&self) -> Arc<dyn PlacementPlugin> {
        Arc::new(MinimizeCoresPlacementPlugin)
    }
}

/// Stateless; all bookkeeping is local to a call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimizeCoresPlacementPlugin;

impl PlacementPlugin for MinimizeCoresPlacementPlugin {
    fn compute_placements(
        &self,
        requests: &[PlacementRequest],
        ctx: &mut PlacementContext<'_>,
    ) -> PlacementResult<Vec<PlacementPlan>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        for request in requests {
            request.validate().inspect_err(|e| {
                warn!(collection = %request.collection, error = %e, "rejecting placement batch");
            })?;
        }

        // One fetch covering every node any request may use.
        let all_nodes = target_node_union(requests);
        ctx.metrics.declare_interest(MetricKey::NumCores);
        ctx.metrics.fetch(&all_nodes);
        let snapshot = ctx.metrics.snapshot();

        let mut projection = CoreProjection::from_snapshot(&all_nodes, &snapshot)
            .inspect_err(|e| warn!(error = %e, "metric fetch incomplete, aborting batch"))?;

        debug!(
            requests = requests.len(),
            nodes = projection.len(),
            "core counts fetched"
        );

        assign_replicas(requests, &mut projection, ctx.plans)
    }
}

/// Every node targeted by at least one request.
pub fn target_node_union(requests: &[PlacementRequest]) -> BTreeSet<Node> {
    requests
        .iter()
        .flat_map(|r| r.target_nodes.iter().cloned())
        .collect()
}

/// A request is feasible when it has at least one distinct target node per
/// replica of a shard.
pub fn check_feasible(request: &PlacementRequest) -> PlacementResult<()> {
    let replicas_per_shard = request.replicas_per_shard();
    if (request.target_nodes.len() as u64) < replicas_per_shard {
        return Err(PlacementError::Infeasible {
            collection: request.collection.clone(),
            target_nodes: request.target_nodes.len(),
            replicas_per_shard,
        });
    }
    Ok(())
}

/// Assign replicas for `requests` in order against `projection`.
///
/// Every request is checked before anything is assigned, so on error
/// `projection` is left untouched. On success it holds the core counts
/// the cluster would have once all plans are applied.
pub fn assign_replicas(
    requests: &[PlacementRequest],
    projection: &mut CoreProjection,
    plans: &dyn PlanBuilder,
) -> PlacementResult<Vec<PlacementPlan>> {
    for request in requests {
        check_feasible(request).inspect_err(|e| {
            warn!(collection = %request.collection, error = %e, "infeasible request, aborting batch");
        })?;
        if let Some(node) = request.target_nodes.iter().find(|n| !projection.contains(n)) {
            let err = PlacementError::MetricUnavailable {
                node: node.clone(),
                metric: MetricKey::NumCores,
            };
            warn!(collection = %request.collection, error = %err, "no core count for target node, aborting batch");
            return Err(err);
        }
    }

    Ok(requests
        .iter()
        .map(|request| place_request(request, projection, plans))
        .collect())
}

fn place_request(
    request: &PlacementRequest,
    projection: &mut CoreProjection,
    plans: &dyn PlanBuilder,
) -> PlacementPlan {
    let per_shard = request.replicas_per_shard() as usize;
    let mut index = CoreCountIndex::build(&request.target_nodes, projection);
    let mut placements = Vec::with_capacity(request.expected_placements() as usize);

    for shard in request.shard_ids() {
        let selected = index.lowest(per_shard);

        for (count, node) in &selected {
            index.bump(*count, node);
            projection.increment(node);
        }

        debug!(
            %shard,
            nodes = ?selected.iter().map(|(_, n)| n.name()).collect::<Vec<_>>(),
            "selected nodes for shard"
        );

        // Least loaded nodes go to the types processed first.
        let slots = request
            .replicas
            .iter()
            .flat_map(|(replica_type, count)| iter::repeat_n(replica_type, count as usize));

        for (replica_type, (_, node)) in slots.zip(&selected) {
            placements.push(plans.make_replica_placement(
                &shard.collection,
                &shard.shard_name,
                node,
                replica_type,
            ));
        }
    }

    info!(
        collection = %request.collection,
        shards = request.shard_names.len(),
        placements = placements.len(),
        "placement plan computed"
    );

    plans.make_placement_plan(request, placements)
}
