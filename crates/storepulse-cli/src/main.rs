mod collect;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storepulse-cli")]
#[command(about = "Collect store reviews into a resumable CSV dataset")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect reviews with the best available source
    Collect,
    /// Collect reviews by driving a browser through the maps site
    Maps {
        /// Show the browser window instead of running headless
        #[arg(long)]
        visible: bool,

        /// Maximum reviews to keep per store
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storepulse_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Collect) => collect::run_collect(&config).await?,
        Some(Commands::Maps { visible, max }) => collect::run_maps(&config, visible, max).await?,
        None => println!("storepulse-cli: run `collect` or `maps` (see --help)"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
