//! StaySync Daemon - Background booking reconciliation service
//!
//! Wires the reconciliation engine to its production adapters:
//! - JSON file snapshot store for the local booking cache
//! - HTTP client for the remote bookings API
//! - A connectivity monitor driven by periodic health probes
//!
//! The daemon runs the scheduler loop until SIGINT, then shuts the
//! engine down gracefully. `--once` runs a single reconciliation pass
//! instead, for cron-style setups.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use staysync_api::client::HttpRemoteStore;
use staysync_core::config::Config;
use staysync_engine::engine::SyncEngine;
use staysync_engine::monitor::SharedConnectivity;
use staysync_engine::scheduler::SyncScheduler;
use staysync_store::JsonFileStore;

/// How often the daemon probes the API's health endpoint
const PROBE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "staysyncd", version, about = "StaySync reconciliation daemon")]
struct Cli {
    /// Use an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single reconciliation pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    init_tracing(&config.logging.level);
    info!(config_path = %config_path.display(), "Loaded configuration");

    let local = Arc::new(JsonFileStore::new(config.store.path.clone()));
    let remote = Arc::new(
        HttpRemoteStore::new(config.api.base_url.clone(), config.api.request_timeout())
            .context("Failed to construct API client")?,
    );
    let connectivity = Arc::new(SharedConnectivity::new(remote.ping().await));

    let engine = Arc::new(SyncEngine::new(
        local,
        remote.clone(),
        connectivity.clone(),
        None, // single-process daemon: no peer contexts to hint
        &config.sync,
    ));

    if cli.once {
        info!("Running a single reconciliation pass");
        engine.force_sync().await;
        return Ok(());
    }

    // Drive the connectivity monitor from periodic health probes. The
    // probe task stops with the engine's shutdown token.
    let probe_shutdown = engine.shutdown_token();
    let probe_remote = remote.clone();
    let probe_monitor = connectivity.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PROBE_INTERVAL);
        loop {
            tokio::select! {
                _ = probe_shutdown.cancelled() => break,
                _ = tick.tick() => {
                    probe_monitor.set_online(probe_remote.ping().await);
                }
            }
        }
    });

    let scheduler = SyncScheduler::new(engine.clone());
    let scheduler_handle = tokio::spawn(async move { scheduler.run().await });

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("SIGINT received, shutting down"),
        Err(err) => warn!(error = %err, "Signal handler failed, shutting down"),
    }

    engine.destroy();
    scheduler_handle
        .await
        .context("Scheduler task panicked")?;

    let status = engine.status().await;
    info!(
        queued = status.queue_length,
        last_sync = ?status.last_sync_time,
        "Daemon stopped"
    );
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("staysync={level},staysyncd={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
