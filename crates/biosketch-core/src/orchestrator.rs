//! SketchOrchestrator - URL in, biographical sketch out
//!
//! Runs the whole pipeline for one request: scrape the profile, take the
//! first record, build the prompt, generate the sketch. Each call is
//! independent; the orchestrator holds only its two collaborators.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::extraction::ProfileExtractor;
use crate::generation::TextGenerator;
use crate::prompt::build_prompt;
use crate::types::{ExtractionInput, ProfileRecord, RunStatus};

/// Shown when no profile URL was supplied
pub const MISSING_URL_MESSAGE: &str = "Please provide a LinkedIn URL";

/// Orchestrates extraction and generation for a single profile URL
#[derive(Clone)]
pub struct SketchOrchestrator {
    extractor: Arc<dyn ProfileExtractor>,
    generator: Arc<dyn TextGenerator>,
}

impl SketchOrchestrator {
    /// Create an orchestrator over the given collaborators
    pub fn new(extractor: Arc<dyn ProfileExtractor>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            extractor,
            generator,
        }
    }

    /// Produce a biographical sketch for a profile URL.
    ///
    /// Fails with [`Error::Validation`] when the URL is absent or blank (no
    /// upstream call is made), [`Error::UpstreamData`] when extraction fails
    /// or yields no record, and [`Error::UpstreamGeneration`] when the
    /// generation call fails.
    pub async fn handle(&self, url: Option<&str>) -> Result<String> {
        let url = match url.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Err(Error::Validation(MISSING_URL_MESSAGE.to_string())),
        };

        let request_id = Uuid::new_v4();
        info!(%request_id, url = %url, "Generating biographical sketch");

        let record = self.fetch_profile(url).await.inspect_err(|e| {
            warn!(%request_id, url = %url, error = %e, "Profile extraction failed");
        })?;

        let prompt = build_prompt(&record);

        let sketch = self.generator.generate(&prompt).await.map_err(|e| {
            warn!(%request_id, error = %e, "Sketch generation failed");
            Error::UpstreamGeneration(format!("Error generating content: {}", e))
        })?;

        info!(%request_id, chars = sketch.len(), "Biographical sketch generated");
        Ok(sketch)
    }

    /// Run the extraction job and take its first record
    async fn fetch_profile(&self, url: &str) -> Result<ProfileRecord> {
        let input = ExtractionInput::single(url);

        let job = self
            .extractor
            .submit(&input)
            .await
            .map_err(|e| Error::UpstreamData(format!("Profile extraction failed: {}", e)))?;

        if job.status != RunStatus::Succeeded {
            warn!(run_id = %job.run_id, status = %job.status, "Extraction run did not succeed");
            return Err(Error::UpstreamData(format!(
                "Profile extraction run {} finished with status {}",
                job.run_id, job.status
            )));
        }

        let records = self
            .extractor
            .fetch_records(&job, input.max_items as usize)
            .await
            .map_err(|e| Error::UpstreamData(format!("Failed to read profile data: {}", e)))?;

        records
            .into_iter()
            .next()
            .ok_or_else(|| Error::UpstreamData(format!("No profile data returned for {}", url)))
    }
}
