use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use shardplace_core::{DefaultPlanBuilder, PlacementPlan, PlacementRequest, ShardplaceConfig};
use shardplace_placement::{PlacementContext, PluginRegistry};

pub fn place(config: &str, requests: &str, format: &str) -> anyhow::Result<()> {
    let output = compute(Path::new(config), Path::new(requests), format)?;
    println!("{output}");
    Ok(())
}

/// Run one placement batch and render the plans.
pub fn compute(config_path: &Path, requests_path: &Path, format: &str) -> anyhow::Result<String> {
    let config = ShardplaceConfig::from_file(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let requests = load_requests(requests_path)?;

    let plugin = PluginRegistry::with_defaults().create(&config.placement)?;
    let mut provider = config.metric_provider();
    let builder = DefaultPlanBuilder;
    let mut ctx = PlacementContext::new(&mut provider, &builder);

    let plans = plugin.compute_placements(&requests, &mut ctx)?;
    info!(
        plugin = %config.placement.plugin,
        plans = plans.len(),
        "placement batch computed"
    );

    match format {
        "json" => Ok(serde_json::to_string_pretty(&plans)?),
        _ => Ok(format_plans(&plans)),
    }
}

fn load_requests(path: &Path) -> anyhow::Result<Vec<PlacementRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let requests = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(requests)
}

pub fn format_plans(plans: &[PlacementPlan]) -> String {
    let mut out = String::new();
    for plan in plans {
        let _ = writeln!(
            out,
            "{} ({} shards, {} placements)",
            plan.request.collection,
            plan.request.shard_names.len(),
            plan.len()
        );
        for placement in &plan.placements {
            let _ = writeln!(out, "  {placement}");
        }
    }
    out.trim_end().to_string()
}
