//! Shardplace placement plugins — decide which node hosts each new replica.
//!
//! Strategies receive a batch of placement requests, pull node metrics
//! through a [`shardplace_core::MetricProvider`], and return one
//! [`shardplace_core::PlacementPlan`] per request. Applying the plans is
//! left to the caller.
//!
//! # Components
//!
//! - **`plugin`** — Plugin and factory contracts, per-call context
//! - **`minimize_cores`** — Greedy core-minimizing strategy
//! - **`cores`** — Per-call core-count projection and ranking index
//! - **`registry`** — Strategy lookup by configured name

pub mod cores;
pub mod minimize_cores;
pub mod plugin;
pub mod registry;

pub use cores::{CoreCountIndex, CoreProjection};
pub use minimize_cores::{
    MinimizeCoresPlacementFactory, MinimizeCoresPlacementPlugin, assign_replicas, check_feasible,
    target_node_union,
};
pub use plugin::{NoConfig, PlacementContext, PlacementPlugin, PlacementPluginFactory};
pub use registry::PluginRegistry;
