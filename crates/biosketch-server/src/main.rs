//! biosketch-server - Biosketch backend server
//!
//! REST API that turns a LinkedIn profile URL into an NIH Biographical Sketch.

use biosketch_core::{ApifyClient, GeminiClient, SketchOrchestrator};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("biosketch_server=info".parse()?)
                .add_directive("biosketch_core=info".parse()?),
        )
        .init();

    info!("biosketch-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = config::Config::load()?;
    match &config.env_file {
        Some(path) => info!("Environment loaded from {:?}", path),
        None => info!("No .env file found, using process environment"),
    }

    // Clients are built once and injected into the orchestrator
    let extractor = ApifyClient::new(config.services.apify.clone())?;
    let generator = GeminiClient::new(config.services.gemini.clone())?;
    let orchestrator = SketchOrchestrator::new(Arc::new(extractor), Arc::new(generator));

    let state = state::AppState::new(orchestrator);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
