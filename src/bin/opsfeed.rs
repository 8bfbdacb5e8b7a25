//! # Opsfeed
//!
//! Runs the dashboard feed against in-memory stores until Ctrl-C.
//!
//! Configuration is read from `$OPSFEED_CONFIG_DIR` (default `config/`),
//! layered by `OPSFEED_ENV` and overridable with `OPSFEED__SECTION__KEY`
//! environment variables.

use anyhow::Context;
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use opsfeed_core::config::ConfigManager;
use opsfeed_core::logging::{init_bootstrap_tracing, init_tracing};
use opsfeed_core::system::FeedSystem;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_dir = std::env::var("OPSFEED_CONFIG_DIR").ok().map(PathBuf::from);
    let manager = {
        let _bootstrap = init_bootstrap_tracing();
        ConfigManager::load_from_directory(config_dir).context("failed to load configuration")?
    };
    let config = manager.config();

    init_tracing(&config.logging);
    info!(
        environment = manager.environment(),
        config_directory = %manager.config_directory().display(),
        version = env!("CARGO_PKG_VERSION"),
        "Starting opsfeed"
    );

    let system = FeedSystem::in_memory(config);
    let report = system
        .seeder()
        .seed()
        .await
        .context("failed to seed stores")?;
    info!(
        metrics = report.metrics,
        tasks = report.tasks,
        alerts = report.alerts,
        "Stores ready"
    );

    let mut events = system.publisher.subscribe();
    let listener = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(
                    topic = %event.topic,
                    payload = %event.payload,
                    "Published"
                ),
                Err(RecvError::Lagged(missed)) => warn!(missed, "Event listener lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut scheduler = system.scheduler();
    scheduler.start().context("failed to start scheduler")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    scheduler.shutdown().await.context("scheduler shutdown failed")?;
    listener.abort();

    let publisher_stats = system.publisher.stats();
    info!(
        published = publisher_stats.published,
        undelivered = publisher_stats.undelivered,
        "Opsfeed stopped"
    );
    Ok(())
}
