//! Server configuration.

use biosketch_core::config::{EnvVars, ServiceConfig};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Flask-era default port, kept so existing front ends keep working
pub const DEFAULT_BIND: &str = "127.0.0.1:5001";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,
    /// Upstream service credentials and endpoints
    pub services: ServiceConfig,
    /// `.env` file values were read from, if any
    pub env_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration once at startup.
    ///
    /// Recognised variables:
    /// ```text
    /// BIOSKETCH_BIND     listen address (default 127.0.0.1:5001)
    /// APIFY_API_KEY      required
    /// APIFY_ACTOR_ID     profile scraper actor
    /// APIFY_BASE_URL     Apify API root
    /// APIFY_WAIT_SECS    server-side wait per run request (max 60)
    /// GEMINI_API_KEY     required
    /// GEMINI_MODEL       generation model (default gemini-2.0-flash)
    /// GEMINI_BASE_URL    Generative Language API root
    /// ```
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(&EnvVars::load())
    }

    pub fn from_env(env: &EnvVars) -> anyhow::Result<Self> {
        let bind = env.get_or("BIOSKETCH_BIND", DEFAULT_BIND);
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid BIOSKETCH_BIND '{}': {}", bind, e))?;

        Ok(Self {
            bind_addr,
            services: ServiceConfig::from_env(env)?,
            env_file: env.source.clone(),
        })
    }
}
