//! # fx-best-rate server
//!
//! Loads configuration, registers the providers and serves the REST API.

use fx_best_rate::api::rest::{AppState, create_router};
use fx_best_rate::application::RateAggregator;
use fx_best_rate::config::{AppConfig, LoggingConfig};
use fx_best_rate::infrastructure::providers::build_providers;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "info,fx_best_rate=debug";

fn init_tracing(logging: LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(config.logging);

    let providers = build_providers(&config.providers)?;
    if providers.is_empty() {
        tracing::warn!("no rate providers enabled, every request will fail");
    }

    let state = Arc::new(AppState::new(RateAggregator::new(providers)));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
