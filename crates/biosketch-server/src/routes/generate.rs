//! Sketch generation route.
//!
//! `POST /generate` takes a form-encoded `linkedin_url` and responds with
//! `{"success": true, "biographical_sketch": "..."}` or an error payload.

use axum::{
    extract::{rejection::FormRejection, State},
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Create generate router
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/generate", post(generate))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SketchResponse {
    pub success: bool,
    pub biographical_sketch: String,
}

/// POST /generate - Generate a biographical sketch for a profile URL
pub async fn generate(
    State(state): State<Arc<AppState>>,
    form: Result<Form<GenerateForm>, FormRejection>,
) -> Result<Json<SketchResponse>, ApiError> {
    // An unreadable form is treated the same as a missing URL
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Rejected generate form: {}", rejection);
            GenerateForm::default()
        }
    };

    let sketch = state
        .orchestrator
        .handle(form.linkedin_url.as_deref())
        .await?;

    Ok(Json(SketchResponse {
        success: true,
        biographical_sketch: sketch,
    }))
}
