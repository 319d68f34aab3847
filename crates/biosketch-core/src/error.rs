//! Error types for biosketch-core.

use thiserror::Error;

/// Result type alias using biosketch-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for biosketch operations
#[derive(Error, Debug)]
pub enum Error {
    // Pipeline errors, surfaced to callers
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UpstreamData(String),

    #[error("{0}")]
    UpstreamGeneration(String),

    // Client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an API error from a non-success HTTP response
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Stable machine-readable code for wire payloads
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UpstreamData(_) => "UPSTREAM_DATA_ERROR",
            Self::UpstreamGeneration(_) => "UPSTREAM_GENERATION_ERROR",
            Self::Http(_) | Self::Api { .. } | Self::InvalidResponse(_) => "UPSTREAM_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the caller is at fault (bad input) rather than an upstream service
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
