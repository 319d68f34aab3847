//! Shared plumbing for the upstream HTTP clients.

use reqwest::{Client, Url};

use crate::error::{Error, Result};

/// Parse a base URL, normalised with a trailing slash so relative joins
/// append to its path instead of replacing the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let normalised = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    Url::parse(&normalised).map_err(|e| Error::config(format!("Invalid base URL '{raw}': {e}")))
}

/// Join a relative API path onto a base URL
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::config(format!("Invalid endpoint '{path}': {e}")))
}

/// HTTP client shared by the upstream clients. No request timeout is set:
/// upstream calls run as long as the services take.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(format!("biosketch/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = parse_base_url("http://localhost:8080/proxy").unwrap();
        let url = endpoint(&base, "/v2/acts/abc/runs").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v2/acts/abc/runs");
    }

    #[test]
    fn test_base_url_without_path() {
        let base = parse_base_url("https://api.apify.com").unwrap();
        let url = endpoint(&base, "v2/datasets/xyz/items").unwrap();
        assert_eq!(url.as_str(), "https://api.apify.com/v2/datasets/xyz/items");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }
}
