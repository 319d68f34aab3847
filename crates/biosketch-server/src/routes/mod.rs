//! API route modules.

pub mod generate;
pub mod health;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(generate::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
