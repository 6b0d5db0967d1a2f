// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::live_sync::LiveSensorSync;
use crate::application::simulation::{Simulator, StdRandom};
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_feed::HttpSensorFeed;
use crate::infrastructure::seed::load_seed_readings;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config().context("Failed to load configuration")?;
    let initial = load_seed_readings(&config.seed.path)?;

    // Create feed (infrastructure layer)
    let feed = Arc::new(HttpSensorFeed::new(
        config.sync.endpoint.clone(),
        config.sync.request_timeout(),
    )?);
    tracing::info!("Live sensor endpoint: {}", feed.endpoint());

    let random = match config.sync.rng_seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_entropy(),
    };

    // Start sync (application layer)
    let mut sync = LiveSensorSync::start(
        feed,
        Simulator::new(Box::new(random)),
        initial,
        config.sync.interval(),
    );

    let state = Arc::new(AppState {
        sync: sync.engine(),
    });

    // Build router (presentation layer)
    let app = router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Starting shm-live-sensors service on {}", addr);

    // Cancelling the sync also ends open snapshot streams so the server can drain.
    let shutdown = sync.engine().shutdown_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        })
        .await?;

    sync.stop().await;

    Ok(())
}
