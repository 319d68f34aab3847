//! Gemini API client.
//!
//! Talks to the Generative Language REST API (`v1beta`):
//! - `POST /v1beta/models/{model}:generateContent` for completions
//! - `GET /v1beta/models` for the model catalogue

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use super::TextGenerator;
use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::http::{build_client, endpoint, parse_base_url};
use crate::types::ModelInfo;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MODELS_PAGE_SIZE: u32 = 50;

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    base_url: Url,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.config.model)
            .finish()
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::InvalidResponse(format!(
                "Prompt was blocked: {}",
                reason
            )));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponse("Response contained no candidates".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate
                .finish_reason
                .unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(Error::InvalidResponse(format!(
                "Candidate contained no text (finish reason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

// ============================================================================
// Client
// ============================================================================

impl GeminiClient {
    /// Create a new client from settings
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client()?;

        info!(
            "Created GeminiClient for base_url: {}, model: {}",
            base_url, config.model
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Model used for generation
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Complete a single-turn prompt
    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let model = self
            .config
            .model
            .strip_prefix("models/")
            .unwrap_or(&self.config.model);
        let url = endpoint(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", model),
        )?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %model, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = Self::read_json(response).await?;
        let text = parsed.into_text()?;

        info!(model = %model, chars = text.len(), "Generated content");
        Ok(text)
    }

    /// List every model available to the API key
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut url = endpoint(&self.base_url, "v1beta/models")?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &MODELS_PAGE_SIZE.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let response = self
                .client
                .get(url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .send()
                .await?;

            let page: ListModelsResponse = Self::read_json(response).await?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) if !seen_tokens.insert(token.clone()) => {
                    warn!("Model listing repeated page token {}, stopping", token);
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} models", models.len());
        Ok(models)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::InvalidResponse(format!("Failed to parse Gemini response: {}", e)));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) => format!("{} ({})", envelope.error.message, code),
                None => envelope.error.message,
            },
            Err(_) => body,
        };

        error!("Gemini request failed: {} - {}", status, message);
        Err(Error::api(status.as_u16(), message))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Captured {
        bodies: Mutex<Vec<Value>>,
        keys: Mutex<Vec<String>>,
    }

    async fn generate_ok(
        State(captured): State<Arc<Captured>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        if let Some(key) = headers.get(API_KEY_HEADER) {
            captured.keys.lock().unwrap().push(key.to_str().unwrap().to_string());
        }
        captured.bodies.lock().unwrap().push(body);
        Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "# Biographical Sketch\n"}, {"text": "Jane Doe"}]},
                "finishReason": "STOP"
            }]
        }))
    }

    async fn generate_quota() -> (StatusCode, Json<Value>) {
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}})),
        )
    }

    async fn generate_blocked() -> Json<Value> {
        Json(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
    }

    async fn list_models(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        match query.get("pageToken").map(String::as_str) {
            None => Json(json!({
                "models": [{
                    "name": "models/gemini-2.0-flash",
                    "displayName": "Gemini 2.0 Flash",
                    "description": "Fast model",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                }],
                "nextPageToken": "page-2"
            })),
            Some(_) => Json(json!({
                "models": [{"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}]
            })),
        }
    }

    async fn spawn_fake() -> (String, Arc<Captured>) {
        let captured = Arc::new(Captured::default());
        let app = Router::new()
            .route("/v1beta/models/gemini-test:generateContent", post(generate_ok))
            .route("/v1beta/models/gemini-quota:generateContent", post(generate_quota))
            .route("/v1beta/models/gemini-blocked:generateContent", post(generate_blocked))
            .route("/v1beta/models", get(list_models))
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn client_for(base_url: &str, model: &str) -> GeminiClient {
        let mut config = GeminiConfig::new("gemini-secret");
        config.base_url = base_url.to_string();
        config.model = model.to_string();
        GeminiClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_joins_candidate_parts() {
        let (base_url, captured) = spawn_fake().await;
        let client = client_for(&base_url, "gemini-test");

        let text = client.generate("Write a sketch").await.unwrap();
        assert_eq!(text, "# Biographical Sketch\nJane Doe");

        let bodies = captured.bodies.lock().unwrap();
        assert_eq!(bodies[0]["contents"][0]["parts"][0]["text"], "Write a sketch");
        assert_eq!(captured.keys.lock().unwrap()[0], "gemini-secret");
    }

    #[tokio::test]
    async fn test_model_prefix_is_stripped() {
        let (base_url, _captured) = spawn_fake().await;
        let client = client_for(&base_url, "models/gemini-test");

        assert!(client.generate("hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_generate_api_error_carries_message() {
        let (base_url, _captured) = spawn_fake().await;
        let client = client_for(&base_url, "gemini-quota");

        let err = client.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("Resource has been exhausted"));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt() {
        let (base_url, _captured) = spawn_fake().await;
        let client = client_for(&base_url, "gemini-blocked");

        let err = client.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_list_models_follows_pages() {
        let (base_url, _captured) = spawn_fake().await;
        let client = client_for(&base_url, "gemini-test");

        let models = client.list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].display_name, "Gemini 2.0 Flash");
        assert!(models[0].supports_generate_content());
        assert!(!models[1].supports_generate_content());
    }

    #[tokio::test]
    async fn test_list_models_stops_on_repeated_token() {
        async fn same_token(State(calls): State<Arc<AtomicUsize>>) -> Json<Value> {
            calls.fetch_add(1, Ordering::SeqCst);
            Json(json!({
                "models": [{"name": "models/gemini-2.0-flash"}],
                "nextPageToken": "again"
            }))
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/v1beta/models", get(same_token))
            .with_state(calls.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = client_for(&format!("http://{}", addr), "gemini-2.0-flash");
        let models = client.list_models().await.unwrap();

        // First page, then the page the token points at; the repeat ends it
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(models.len(), 2);
    }

    #[test]
    fn test_candidate_without_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "RECITATION"}]
        }))
        .unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("RECITATION"));
    }

    #[test]
    fn test_no_candidates() {
        let err = GenerateContentResponse::default().into_text().unwrap_err();
        assert!(err.to_string().contains("no candidates"));
    }
}
