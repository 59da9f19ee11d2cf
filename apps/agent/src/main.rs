//! Uplink agent entry point.

mod config;
mod console;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use uplink_radio::{SimRadio, bring_up};
use uplink_station::{Supervisor, TracingReporter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting uplink agent");

    let path = config::config_path();
    let agent_config = match config::AgentConfig::load(path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            config::AgentConfig::default()
        }
    };

    let radio = Arc::new(SimRadio::new());
    bring_up(radio.as_ref(), &agent_config.network)
        .context("network stack initialisation failed")?;

    let handle = Supervisor::spawn(
        radio.clone(),
        TracingReporter,
        agent_config.supervisor.to_config(),
    )
    .context("station supervisor failed to start")?;

    // The simulated stack reports the station interface as soon as it starts.
    handle.station_started()?;

    console::run(handle.clone(), radio).await?;

    handle.shutdown();
    handle.stopped().await;
    tracing::info!("uplink agent stopped");
    Ok(())
}
