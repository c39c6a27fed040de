use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tierwatch",
    about = "MongoDB Atlas tier watchdog — reverts autoscaled shards once load subsides",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection and fleet arguments shared by every subcommand.
#[derive(Args)]
struct CommonArgs {
    /// Atlas project (group) identifier
    #[arg(long, env = "ATLAS_PROJECT_ID")]
    project_id: String,
    /// Atlas service-account bearer token
    #[arg(long, env = "ATLAS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,
    /// Fleet bookkeeping file
    #[arg(long, default_value = "clusterConfig.json")]
    config_file: String,
    /// Tier capacity table (CSV: tier,ram,connection,iops)
    #[arg(long, default_value = "tierConfig.csv")]
    tier_specs: String,
    /// Optional runtime settings file (TOML)
    #[arg(long)]
    settings: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep the fleet and revert shards that are safe to scale down
    Monitor {
        /// Override the minimum hours since the last tier change
        #[arg(long)]
        min_hours_since_update: Option<f64>,
        /// Keep sweeping on an interval instead of exiting after one pass
        #[arg(long)]
        watch: bool,
        /// Seconds between sweeps in watch mode
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
    /// Scale every base-tier shard in the fleet up to its scale-up tier
    ScaleUp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tierwatch=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            min_hours_since_update,
            watch,
            interval,
        } => commands::monitor::run(&cli.common, min_hours_since_update, watch, interval).await,
        Commands::ScaleUp => commands::scale_up::run(&cli.common).await,
    }
}
