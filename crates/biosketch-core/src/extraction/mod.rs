//! Profile extraction.
//!
//! The extraction service is treated as a job API: submit a scrape, wait for
//! it to reach a terminal state, then page through the records it produced.

mod apify;

pub use apify::ApifyClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExtractionInput, ExtractionJob, ProfileRecord};

/// Collaborator that turns a profile URL into structured records
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    /// Submit a scrape and wait until it finishes (successfully or not)
    async fn submit(&self, input: &ExtractionInput) -> Result<ExtractionJob>;

    /// Read up to `limit` records produced by a finished job, in order
    async fn fetch_records(&self, job: &ExtractionJob, limit: usize)
        -> Result<Vec<ProfileRecord>>;
}
