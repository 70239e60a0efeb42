use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "shardplace",
    about = "Shardplace — replica placement for sharded search clusters",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute placement plans for a batch of requests.
    ///
    /// Node core counts and the strategy to use are read from the config
    /// file; requests are a JSON array.
    Place {
        /// Path to shardplace.toml
        #[arg(short, long, default_value = "shardplace.toml")]
        config: String,
        /// Path to the JSON request batch
        #[arg(short, long)]
        requests: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// List available placement strategies
    Plugins,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shardplace=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Place {
            config,
            requests,
            format,
        } => commands::place::place(&config, &requests, &format),
        Commands::Plugins => commands::plugins::list(),
    }
}
