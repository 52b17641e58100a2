mod config;
mod error;
mod metrics;
mod routes;
mod state;

use anyhow::{Context, Result};
use config::{AppConfig, LogFormat, LoggingConfig};
use extract::SystemClock;
use state::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.logging);

    let state = Arc::new(AppState::new(&config, Arc::new(SystemClock)));
    tracing::info!(data_file = ?state.store.path(), "Using task file");

    // Build router
    let app = routes::build_router(state, routes::cors_layer(&config.cors));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str())
        .await
        .context(format!("Failed to bind {}", config.server.bind))?;

    tracing::info!("Server listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?} ({}), falling back to info", config.filter, e);
        EnvFilter::new("info")
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
