mod api;
mod bootstrap;
mod health;
mod weather;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use lunchmate_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;

fn init_logging(config: &AppConfig) {
    use lunchmate_core::config::LogFormat::*;
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
    // Logging depends on the loaded config, so load it before anything else.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;
    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        advisor = app.advisor.name(),
        "lunchmate-server listening"
    );

    let shutdown = Arc::new(Notify::new());
    let signal = shutdown.clone();
    let server = axum::serve(listener, app.router())
        .with_graceful_shutdown(async move {
            wait_for_shutdown().await;
            signal.notify_one();
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = async {
            shutdown.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "in-flight requests did not finish before the shutdown deadline"
            );
        }
    }

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "lunchmate-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "failed to listen for shutdown signal"
        );
        std::future::pending::<()>().await;
    }
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "shutdown signal received, draining requests"
    );
}
