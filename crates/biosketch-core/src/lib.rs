//! biosketch-core - Core library for Biosketch
//!
//! This crate provides the shared functionality behind the biosketch server
//! and CLI:
//!
//! - **extraction**: Profile extraction through Apify actor runs
//! - **generation**: Text generation through the Gemini API
//! - **prompt**: NIH Biographical Sketch prompt assembly
//! - **orchestrator**: The URL → record → prompt → text pipeline
//! - **config**: Credentials and endpoint settings from the environment

pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
mod http;
pub mod orchestrator;
pub mod prompt;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use extraction::{ApifyClient, ProfileExtractor};
pub use generation::{GeminiClient, TextGenerator};
pub use orchestrator::SketchOrchestrator;
pub use types::ProfileRecord;
