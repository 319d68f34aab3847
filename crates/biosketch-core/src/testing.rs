//! In-memory collaborators for tests.
//!
//! Enabled for this crate's unit tests and, through the `test-utils`
//! feature, for dependent crates.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::extraction::ProfileExtractor;
use crate::generation::TextGenerator;
use crate::types::{ExtractionInput, ExtractionJob, ProfileRecord, RunStatus};

/// Extractor that returns canned records and remembers what it was asked
pub struct StaticExtractor {
    records: Vec<ProfileRecord>,
    status: RunStatus,
    failure: Option<String>,
    submitted: Mutex<Vec<ExtractionInput>>,
}

impl StaticExtractor {
    /// Every run succeeds and yields `records`
    pub fn with_records(records: Vec<ProfileRecord>) -> Self {
        Self {
            records,
            status: RunStatus::Succeeded,
            failure: None,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Every run succeeds with an empty dataset
    pub fn empty() -> Self {
        Self::with_records(Vec::new())
    }

    /// Every run ends in `status`
    pub fn with_status(status: RunStatus) -> Self {
        Self {
            status,
            ..Self::empty()
        }
    }

    /// Submitting fails with an API error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::empty()
        }
    }

    /// Inputs submitted so far
    pub fn submitted(&self) -> Vec<ExtractionInput> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.submitted().len()
    }
}

#[async_trait]
impl ProfileExtractor for StaticExtractor {
    async fn submit(&self, input: &ExtractionInput) -> Result<ExtractionJob> {
        let run_number = {
            let mut submitted = self
                .submitted
                .lock()
                .map_err(|_| Error::InvalidResponse("extractor lock poisoned".into()))?;
            submitted.push(input.clone());
            submitted.len()
        };

        if let Some(message) = &self.failure {
            return Err(Error::api(500, message.clone()));
        }

        Ok(ExtractionJob {
            run_id: format!("run-{}", run_number),
            status: self.status,
            dataset_id: format!("dataset-{}", run_number),
        })
    }

    async fn fetch_records(
        &self,
        _job: &ExtractionJob,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

/// Extractor that echoes the submitted URL back as the record
#[derive(Default)]
pub struct EchoExtractor;

#[async_trait]
impl ProfileExtractor for EchoExtractor {
    async fn submit(&self, input: &ExtractionInput) -> Result<ExtractionJob> {
        let url = input.profile_urls.first().cloned().unwrap_or_default();
        Ok(ExtractionJob {
            run_id: "echo".into(),
            status: RunStatus::Succeeded,
            dataset_id: url,
        })
    }

    async fn fetch_records(
        &self,
        job: &ExtractionJob,
        _limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        let mut fields = serde_json::Map::new();
        fields.insert("url".into(), serde_json::Value::String(job.dataset_id.clone()));
        Ok(vec![ProfileRecord::new(fields)])
    }
}

/// Generator that replies with a fixed text or a fixed failure
pub struct StaticGenerator {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an API error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .map_err(|_| Error::InvalidResponse("generator lock poisoned".into()))?
            .push(prompt.to_string());

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(Error::api(500, message.clone())),
        }
    }
}

/// Generator that returns the prompt it was given
#[derive(Default)]
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}
