//! Service configuration.
//!
//! Settings are read once at startup with precedence:
//! 1. Process environment variables
//! 2. A `.env` file in the working directory or any parent
//! 3. Default values (credentials have none)

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default Apify actor: LinkedIn profile scraper
pub const DEFAULT_ACTOR_ID: &str = "2SyF0bVxmgGr8IVCZ";
pub const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com";
/// Apify caps server-side waiting at 60 seconds per request
pub const MAX_WAIT_SECS: u64 = 60;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Apify connection settings
#[derive(Clone)]
pub struct ApifyConfig {
    /// API token
    pub token: String,
    /// Actor that scrapes profiles
    pub actor_id: String,
    /// API base URL
    pub base_url: String,
    /// Seconds the API may hold each run request open while the run finishes
    pub wait_secs: u64,
}

impl fmt::Debug for ApifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApifyConfig")
            .field("token", &"<redacted>")
            .field("actor_id", &self.actor_id)
            .field("base_url", &self.base_url)
            .field("wait_secs", &self.wait_secs)
            .finish()
    }
}

impl ApifyConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            actor_id: DEFAULT_ACTOR_ID.to_string(),
            base_url: DEFAULT_APIFY_BASE_URL.to_string(),
            wait_secs: MAX_WAIT_SECS,
        }
    }
}

/// Gemini connection settings
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Model used for generateContent
    pub model: String,
    /// API base URL
    pub base_url: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Settings for both upstream services
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub apify: ApifyConfig,
    pub gemini: GeminiConfig,
}

impl ServiceConfig {
    /// Load from the process environment and any `.env` file
    pub fn load() -> Result<Self> {
        Self::from_env(&EnvVars::load())
    }

    /// Build from a variable source
    pub fn from_env(env: &EnvVars) -> Result<Self> {
        let apify_token = env.require("APIFY_API_KEY")?;
        let gemini_key = env.require("GEMINI_API_KEY")?;

        let wait_secs = match env.get("APIFY_WAIT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::config(format!("APIFY_WAIT_SECS is not a number: {raw}")))?
                .min(MAX_WAIT_SECS),
            None => MAX_WAIT_SECS,
        };

        Ok(Self {
            apify: ApifyConfig {
                token: apify_token,
                actor_id: env.get_or("APIFY_ACTOR_ID", DEFAULT_ACTOR_ID),
                base_url: env.get_or("APIFY_BASE_URL", DEFAULT_APIFY_BASE_URL),
                wait_secs,
            },
            gemini: GeminiConfig {
                api_key: gemini_key,
                model: env.get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: env.get_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            },
        })
    }
}

/// Environment variable source: the process environment, or fixed pairs
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
    use_process_env: bool,
    /// The `.env` file that supplied values, if any
    pub source: Option<PathBuf>,
}

impl EnvVars {
    /// Read the process environment after loading the nearest `.env` file.
    ///
    /// The file is searched for in the working directory and its parents;
    /// variables already set in the process win over file values.
    pub fn load() -> Self {
        let source = match dotenvy::dotenv() {
            Ok(path) => {
                debug!("Loaded environment file {:?}", path);
                Some(path)
            }
            Err(e) if e.not_found() => None,
            Err(e) => {
                warn!("Failed to load .env file: {}", e);
                None
            }
        };

        Self {
            vars: HashMap::new(),
            use_process_env: true,
            source,
        }
    }

    /// A source backed only by the values of one `.env` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let vars = iter
            .collect::<std::result::Result<HashMap<_, _>, _>>()
            .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))?;

        Ok(Self {
            vars,
            use_process_env: false,
            source: Some(path.to_path_buf()),
        })
    }

    /// A source backed only by the given pairs (no process environment)
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            use_process_env: false,
            source: None,
        }
    }

    /// Look up a variable; empty values count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        let value = if self.use_process_env {
            std::env::var(key).ok()
        } else {
            self.vars.get(key).cloned()
        };

        value.filter(|v| !v.trim().is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .ok_or_else(|| Error::config(format!("{key} is not set")))
    }
}
