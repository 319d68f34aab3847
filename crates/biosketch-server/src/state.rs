//! Application state.

use biosketch_core::SketchOrchestrator;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Pipeline shared by all requests; holds no per-request state
    pub orchestrator: Arc<SketchOrchestrator>,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(orchestrator: SketchOrchestrator) -> Arc<Self> {
        Arc::new(Self {
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        })
    }
}
