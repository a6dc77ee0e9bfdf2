//! Command handlers.

use crate::config::{OutputFormat, RippleConfig};
use anyhow::Context;
use console::style;
use ripple_api::{AppState, build_app};
use ripple_core::ids::SnapshotId;
use ripple_core::{Clock, SystemClock};
use ripple_db::Database;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

async fn connect(config: &RippleConfig) -> anyhow::Result<Database> {
    Database::connect_with(&config.database)
        .await
        .context("connecting to database")
}

fn app_state(config: &RippleConfig, db: &Database) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    AppState::from_database(db, clock, config.gc.clone())
}

/// Run the HTTP API until interrupted.
pub async fn serve(
    config: &RippleConfig,
    bind: Option<String>,
    skip_migrations: bool,
) -> anyhow::Result<()> {
    let db = connect(config).await?;
    if !skip_migrations {
        db.migrate().await?;
    }

    let app = build_app(Arc::new(app_state(config, &db)));
    let addr = bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(
        addr = %addr,
        grace_period_secs = config.gc.grace_period_secs,
        "Ripple API listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Apply pending migrations.
pub async fn migrate(config: &RippleConfig) -> anyhow::Result<()> {
    let db = connect(config).await?;
    db.migrate().await?;
    println!("{} Migrations applied", style("✓").green());
    Ok(())
}

/// Pin a snapshot's images and expire superseded ones.
pub async fn gc_cache(config: &RippleConfig, snapshot_id: &str, dry_run: bool) -> anyhow::Result<()> {
    let id: SnapshotId = snapshot_id
        .parse()
        .with_context(|| format!("invalid snapshot ID: {snapshot_id}"))?;

    let db = connect(config).await?;
    let state = app_state(config, &db);
    let snapshot = state
        .snapshots
        .get(id)
        .await?
        .ok_or_else(|| ripple_core::Error::SnapshotNotFound(id.to_string()))?;

    if !dry_run {
        state.snapshot_cache.cache_snapshot(&snapshot).await?;
        println!("{} Cached snapshot {}", style("✓").green(), id);
        return Ok(());
    }

    let write = state.snapshot_cache.plan_cache_write(&snapshot).await?;
    println!(
        "{} Would write {} entries ({} pinned)",
        style("!").yellow(),
        write.len(),
        write.pinned_count()
    );
    for (image_id, expires) in write.iter() {
        match expires {
            Some(at) => println!("  {}  expires {}", image_id, style(at.to_rfc3339()).dim()),
            None => println!("  {}  {}", image_id, style("pinned").cyan()),
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ClusterImages<T> {
    cluster: String,
    total: usize,
    images: Vec<T>,
}

/// Print the live cached images of a cluster.
pub async fn gc_list(config: &RippleConfig, cluster: &str, format: OutputFormat) -> anyhow::Result<()> {
    let db = connect(config).await?;
    let images = app_state(config, &db)
        .snapshot_cache
        .get_cached_snapshot_images(cluster)
        .await?;

    let listing = ClusterImages {
        cluster: cluster.to_string(),
        total: images.len(),
        images,
    };
    println!("{}", render(&listing, format)?);
    Ok(())
}

/// Print the effective configuration.
pub fn show_config(config: &RippleConfig) -> anyhow::Result<()> {
    println!("{}", render(config, OutputFormat::Yaml)?);
    Ok(())
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}
