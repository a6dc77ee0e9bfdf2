//! CLI command definitions.

use clap::Subcommand;

use crate::config::OutputFormat;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Do not apply migrations on startup
        #[arg(long)]
        skip_migrations: bool,
    },

    /// Apply database migrations
    Migrate,

    /// Snapshot image cache maintenance
    Gc {
        #[command(subcommand)]
        command: GcCommands,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum GcCommands {
    /// Pin a snapshot's images and schedule older cluster images for expiry
    Cache {
        /// Snapshot ID
        snapshot_id: String,

        /// Print the planned writes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// List the live cached images of a cluster
    List {
        /// Cluster name
        cluster: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}
