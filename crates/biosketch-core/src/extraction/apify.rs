//! Apify client for actor runs and dataset items.
//!
//! Uses the v2 REST API:
//! - `POST /v2/acts/{actorId}/runs` starts a run with the actor input
//! - `GET /v2/actor-runs/{runId}` reports run status
//! - `GET /v2/datasets/{datasetId}/items` pages through run output
//!
//! Run requests pass `waitForFinish` so the API holds the connection open
//! until the run ends or the wait elapses; the client keeps polling until the
//! run is terminal.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::ProfileExtractor;
use crate::config::ApifyConfig;
use crate::error::{Error, Result};
use crate::http::{build_client, endpoint, parse_base_url};
use crate::types::{ExtractionInput, ExtractionJob, ProfileRecord, RunStatus};

/// Delay between polls when server-side waiting is disabled
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Apify API client
pub struct ApifyClient {
    client: Client,
    base_url: Url,
    config: ApifyConfig,
}

impl std::fmt::Debug for ApifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifyClient")
            .field("base_url", &self.base_url.as_str())
            .field("actor_id", &self.config.actor_id)
            .field("wait_secs", &self.config.wait_secs)
            .finish()
    }
}

/// Every Apify object response is wrapped in `{"data": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// The subset of a run object this client reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunData {
    id: String,
    status: RunStatus,
    default_dataset_id: String,
}

impl From<RunData> for ExtractionJob {
    fn from(run: RunData) -> Self {
        Self {
            run_id: run.id,
            status: run.status,
            dataset_id: run.default_dataset_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    message: String,
}

impl ApifyClient {
    /// Create a new client from settings
    pub fn new(config: ApifyConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = build_client()?;

        info!(
            "Created ApifyClient for base_url: {}, actor: {}",
            base_url, config.actor_id
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Actor this client runs
    pub fn actor_id(&self) -> &str {
        &self.config.actor_id
    }

    /// Start an actor run without waiting for it to finish
    async fn start_run(&self, input: &ExtractionInput) -> Result<RunData> {
        let mut url = endpoint(
            &self.base_url,
            &format!("v2/acts/{}/runs", self.config.actor_id),
        )?;
        url.query_pairs_mut()
            .append_pair("waitForFinish", &self.config.wait_secs.to_string());

        debug!("Starting actor run at: {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .json(input)
            .send()
            .await?;

        let envelope: Envelope<RunData> = Self::read_json(response).await?;
        Ok(envelope.data)
    }

    /// Fetch a run's current state, letting the API wait for it to finish
    async fn get_run(&self, run_id: &str) -> Result<RunData> {
        let mut url = endpoint(&self.base_url, &format!("v2/actor-runs/{}", run_id))?;
        url.query_pairs_mut()
            .append_pair("waitForFinish", &self.config.wait_secs.to_string());

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let envelope: Envelope<RunData> = Self::read_json(response).await?;
        Ok(envelope.data)
    }

    /// Decode a success body or turn the response into an API error
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::InvalidResponse(format!("Failed to parse Apify response: {}", e)));
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.error.kind {
                Some(kind) => format!("{} ({})", envelope.error.message, kind),
                None => envelope.error.message,
            },
            Err(_) => body,
        };

        error!("Apify request failed: {} - {}", status, message);
        Err(Error::api(status.as_u16(), message))
    }
}

#[async_trait]
impl ProfileExtractor for ApifyClient {
    async fn submit(&self, input: &ExtractionInput) -> Result<ExtractionJob> {
        let mut run = self.start_run(input).await?;
        info!(run_id = %run.id, status = %run.status, "Actor run started");

        while !run.status.is_terminal() {
            if self.config.wait_secs == 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            debug!(run_id = %run.id, status = %run.status, "Waiting for actor run");
            run = self.get_run(&run.id).await?;
        }

        if run.status == RunStatus::Succeeded {
            info!(run_id = %run.id, dataset_id = %run.default_dataset_id, "Actor run finished");
        } else {
            warn!(run_id = %run.id, status = %run.status, "Actor run did not succeed");
        }

        Ok(run.into())
    }

    async fn fetch_records(
        &self,
        job: &ExtractionJob,
        limit: usize,
    ) -> Result<Vec<ProfileRecord>> {
        let mut url = endpoint(
            &self.base_url,
            &format!("v2/datasets/{}/items", job.dataset_id),
        )?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("clean", "true")
            .append_pair("limit", &limit.to_string());

        debug!("Fetching dataset items from: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;

        let items: Vec<serde_json::Value> = Self::read_json(response).await?;

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                ProfileRecord::try_from(item).map_err(|other| {
                    warn!(dataset_id = %job.dataset_id, index, "Dataset item is not an object");
                    Error::InvalidResponse(format!(
                        "Dataset item {} is not a JSON object: {}",
                        index, other
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeApify {
        polls: AtomicUsize,
        inputs: Mutex<Vec<Value>>,
        queries: Mutex<Vec<HashMap<String, String>>>,
        auth: Mutex<Vec<String>>,
    }

    fn run_json(status: &str) -> Value {
        json!({"data": {"id": "run-1", "status": status, "defaultDatasetId": "ds-1", "actId": "x"}})
    }

    async fn start_run(
        State(fake): State<Arc<FakeApify>>,
        Path(actor): Path<String>,
        headers: HeaderMap,
        Json(input): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if let Some(auth) = headers.get("authorization") {
            fake.auth.lock().unwrap().push(auth.to_str().unwrap().to_string());
        }
        fake.inputs.lock().unwrap().push(input);
        if actor == "missing" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"type": "record-not-found", "message": "Actor was not found"}})),
            );
        }
        (StatusCode::CREATED, Json(run_json("RUNNING")))
    }

    async fn get_run(State(fake): State<Arc<FakeApify>>) -> Json<Value> {
        // Report RUNNING once more, then SUCCEEDED
        let n = fake.polls.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            Json(run_json("RUNNING"))
        } else {
            Json(run_json("SUCCEEDED"))
        }
    }

    async fn dataset_items(
        State(fake): State<Arc<FakeApify>>,
        Path(dataset): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        let limit = query
            .get("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(usize::MAX);
        fake.queries.lock().unwrap().push(query);

        let items = match dataset.as_str() {
            "empty" => vec![],
            "scalar-first" => vec![json!("stray string"), json!({"fullName": "Jane Doe"})],
            _ => vec![
                json!({"fullName": "Jane Doe", "headline": "Researcher"}),
                json!({"fullName": "Second Record"}),
            ],
        };
        Json(Value::Array(items.into_iter().take(limit).collect()))
    }

    async fn spawn_fake() -> (String, Arc<FakeApify>) {
        let fake = Arc::new(FakeApify::default());
        let app = Router::new()
            .route("/v2/acts/{actor}/runs", post(start_run))
            .route("/v2/actor-runs/{id}", get(get_run))
            .route("/v2/datasets/{id}/items", get(dataset_items))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), fake)
    }

    fn client_for(base_url: &str, actor_id: &str) -> ApifyClient {
        let mut config = ApifyConfig::new("secret-token");
        config.base_url = base_url.to_string();
        config.actor_id = actor_id.to_string();
        config.wait_secs = 5;
        ApifyClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_submit_polls_until_terminal() {
        let (base_url, fake) = spawn_fake().await;
        let client = client_for(&base_url, "profile-scraper");

        let job = client
            .submit(&ExtractionInput::single("https://www.linkedin.com/in/jane"))
            .await
            .unwrap();

        assert_eq!(job.run_id, "run-1");
        assert_eq!(job.dataset_id, "ds-1");
        assert_eq!(job.status, RunStatus::Succeeded);
        assert_eq!(fake.polls.load(Ordering::SeqCst), 2);

        let inputs = fake.inputs.lock().unwrap();
        assert_eq!(
            inputs[0],
            json!({"profileUrls": ["https://www.linkedin.com/in/jane"], "maxItems": 1})
        );
        assert_eq!(fake.auth.lock().unwrap()[0], "Bearer secret-token");
    }

    #[tokio::test]
    async fn test_submit_surfaces_api_error() {
        let (base_url, _fake) = spawn_fake().await;
        let client = client_for(&base_url, "missing");

        let err = client
            .submit(&ExtractionInput::single("https://www.linkedin.com/in/jane"))
            .await
            .unwrap_err();

        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("Actor was not found"));
                assert!(message.contains("record-not-found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_records_honours_limit() {
        let (base_url, fake) = spawn_fake().await;
        let client = client_for(&base_url, "profile-scraper");
        let job = ExtractionJob {
            run_id: "run-1".into(),
            status: RunStatus::Succeeded,
            dataset_id: "ds-1".into(),
        };

        let records = client.fetch_records(&job, 1).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("fullName"), Some(&json!("Jane Doe")));

        let queries = fake.queries.lock().unwrap();
        assert_eq!(queries[0].get("limit").map(String::as_str), Some("1"));
        assert_eq!(queries[0].get("format").map(String::as_str), Some("json"));
    }

    #[tokio::test]
    async fn test_fetch_records_rejects_non_object_item() {
        let (base_url, _fake) = spawn_fake().await;
        let client = client_for(&base_url, "profile-scraper");
        let job = ExtractionJob {
            run_id: "run-1".into(),
            status: RunStatus::Succeeded,
            dataset_id: "scalar-first".into(),
        };

        // The API applies the limit before the client sees the items
        let err = client.fetch_records(&job, 1).await.unwrap_err();
        match err {
            Error::InvalidResponse(message) => {
                assert!(message.contains("not a JSON object"));
                assert!(message.contains("stray string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_records_empty_dataset() {
        let (base_url, _fake) = spawn_fake().await;
        let client = client_for(&base_url, "profile-scraper");
        let job = ExtractionJob {
            run_id: "run-1".into(),
            status: RunStatus::Succeeded,
            dataset_id: "empty".into(),
        };

        let records = client.fetch_records(&job, 1).await.unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client_for("http://localhost:1", "profile-scraper");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("profile-scraper"));
    }
}
