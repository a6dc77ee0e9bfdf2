//! Ripple CI entrypoint.

use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod handlers;
mod telemetry;

use commands::{Commands, GcCommands};
use config::RippleConfig;

#[derive(Parser)]
#[command(name = "ripple")]
#[command(author, version, about = "Ripple CI server and maintenance tool", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./ripple.{yaml,toml,json} when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = RippleConfig::load(cli.config.as_deref())?;
    telemetry::init(&config.logging);
    config.validate()?;

    match cli.command {
        Commands::Serve {
            bind,
            skip_migrations,
        } => handlers::serve(&config, bind, skip_migrations).await?,
        Commands::Migrate => handlers::migrate(&config).await?,
        Commands::Gc { command } => match command {
            GcCommands::Cache {
                snapshot_id,
                dry_run,
            } => handlers::gc_cache(&config, &snapshot_id, dry_run).await?,
            GcCommands::List { cluster, format } => {
                handlers::gc_list(&config, &cluster, format).await?
            }
        },
        Commands::Config => handlers::show_config(&config)?,
    }

    Ok(())
}
