//! Placement plugin contract.
//!
//! A strategy is a [`PlacementPlugin`] produced by a
//! [`PlacementPluginFactory`]. The factory receives its strategy-specific
//! configuration once, at construction; the plugin itself exposes a single
//! entry point and keeps no state between calls, so one instance can serve
//! concurrent computations.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use shardplace_core::{MetricProvider, PlacementPlan, PlacementRequest, PlacementResult, PlanBuilder};

/// Collaborators available to a plugin during one computation.
pub struct PlacementContext<'a> {
    /// Source of node metrics. Fetched at most once per call.
    pub metrics: &'a mut dyn MetricProvider,
    /// Builds the output values.
    pub plans: &'a dyn PlanBuilder,
}

impl<'a> PlacementContext<'a> {
    pub fn new(metrics: &'a mut dyn MetricProvider, plans: &'a dyn PlanBuilder) -> Self {
        Self { metrics, plans }
    }
}

/// A replica placement strategy.
pub trait PlacementPlugin: Send + Sync {
    /// Compute one plan per request, in request order.
    ///
    /// Fails without returning any plan if a single request cannot be
    /// satisfied.
    fn compute_placements(
        &self,
        requests: &[PlacementRequest],
        ctx: &mut PlacementContext<'_>,
    ) -> PlacementResult<Vec<PlacementPlan>>;
}

/// Builds instances of one placement strategy.
pub trait PlacementPluginFactory: Send + Sync + 'static {
    /// Name the strategy is registered under.
    const NAME: &'static str;

    /// Strategy-specific configuration. Missing config means `Default`.
    type Config: DeserializeOwned + Default;

    fn new(config: Self::Config) -> Self
    where
        Self: Sized;

    fn create_plugin_instance(&self) -> Arc<dyn PlacementPlugin>;
}

/// Configuration for strategies that take none. Any key is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoConfig {}
