use shardplace_placement::PluginRegistry;

pub fn list() -> anyhow::Result<()> {
    let registry = PluginRegistry::with_defaults();
    for name in registry.names() {
        println!("{name}");
    }
    Ok(())
}
