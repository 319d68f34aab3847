//! Text generation.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Collaborator that completes a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
