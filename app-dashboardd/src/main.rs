mod api;
mod clock;
mod config;
mod listing;
mod probe;
mod records;
mod registry;

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use crate::clock::SystemClock;
use crate::config::{Config, ENDPOINT_ENV};
use crate::probe::UrlProber;
use crate::registry::client::RegistryClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("app_dashboardd=info"))
        )
        .init();

    tracing::info!("Starting app-dashboardd");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let mut config = Config::load_or_default(config_path.clone())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    config.override_endpoint(std::env::var(ENDPOINT_ENV).ok());
    config.validate().context("Invalid configuration")?;

    let registry = RegistryClient::new(config.registry_endpoint()?)?;
    tracing::info!("Using registry at {}", registry.endpoint());

    let prober = UrlProber::new(config.probe.concurrency)?;
    tracing::info!("Probing deployment URLs {} at a time", config.probe.concurrency);

    let app = api::routes::router(api::routes::AppState {
        registry,
        prober,
        clock: Arc::new(SystemClock),
    });

    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("API listening on {}", config.api.listen);

    let cancel = CancellationToken::new();
    let server_cancel = cancel.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutdown signal received");
    cancel.cancel();

    if let Err(e) = server_handle.await {
        tracing::error!("Server task failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
