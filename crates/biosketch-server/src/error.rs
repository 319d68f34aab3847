//! Error responses for the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use biosketch_core::Error;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error returned by route handlers
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

/// Wire format for failures
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), code = self.0.code(), "Request failed: {}", self.0);

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
        });

        (status, body).into_response()
    }
}
