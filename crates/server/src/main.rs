mod bootstrap;
mod health;

use std::time::Duration;

use anyhow::Result;
use leetdraw_core::config::{AppConfig, LoadOptions};

use crate::bootstrap::{bootstrap_with_config, load_config};

fn init_logging(config: &AppConfig) {
    use leetdraw_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = load_config(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap_with_config(config).await?;

    health::spawn(
        &app.config.server.bind_address,
        app.config.server.health_check_port,
        app.gateway_runner.clone(),
    )
    .await?;

    tracing::info!(
        event_name = "system.server.gateway_transport_mode",
        transport_mode = app.gateway_runner.transport_mode(),
        correlation_id = "bootstrap",
        "discord gateway transport mode initialized"
    );

    let runner = app.gateway_runner.clone();
    let mut gateway_task = tokio::spawn(async move { runner.start().await });

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        "leetdraw-server started"
    );
    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "leetdraw-server stopping"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    if tokio::time::timeout(grace, &mut gateway_task).await.is_err() {
        tracing::warn!(
            event_name = "system.server.shutdown_timeout",
            correlation_id = "shutdown",
            grace_secs = app.config.server.graceful_shutdown_secs,
            "gateway runner did not stop in time; aborting"
        );
        gateway_task.abort();
    }

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
