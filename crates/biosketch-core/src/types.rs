//! Shared types for biosketch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Profile Records
// ─────────────────────────────────────────────────────────────────────────────

/// A profile as returned by the extraction service.
///
/// No schema is enforced: keys and values are whatever the scraper produced
/// (name, headline, experience, education, ...). The record is passed through
/// opaquely into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileRecord(Map<String, Value>);

impl ProfileRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Pretty JSON rendering used for prompt embedding
    pub fn to_pretty_json(&self) -> String {
        // A map of JSON values always serializes
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for ProfileRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for ProfileRecord {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction Jobs
// ─────────────────────────────────────────────────────────────────────────────

/// Actor input for a profile scrape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionInput {
    pub profile_urls: Vec<String>,
    pub max_items: u32,
}

impl ExtractionInput {
    /// Input for scraping exactly one profile
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            profile_urls: vec![url.into()],
            max_items: 1,
        }
    }
}

/// Lifecycle status of an actor run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    TimingOut,
    TimedOut,
    Aborting,
    Aborted,
}

impl RunStatus {
    /// Terminal statuses never change again
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::TimedOut | Self::Aborted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::TimingOut => "TIMING-OUT",
            Self::TimedOut => "TIMED-OUT",
            Self::Aborting => "ABORTING",
            Self::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a submitted extraction job
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionJob {
    pub run_id: String,
    pub status: RunStatus,
    pub dataset_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Models
// ─────────────────────────────────────────────────────────────────────────────

/// A model offered by the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Whether the model can serve `generateContent` calls
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }

    /// Whether this entry names `model`, with or without the `models/` prefix
    pub fn is_model(&self, model: &str) -> bool {
        let name = self.name.strip_prefix("models/").unwrap_or(&self.name);
        name == model.strip_prefix("models/").unwrap_or(model)
    }
}
