//! Error types for the GPA API boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use gpa_engine::EngineError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable kind. The upload UI treats every failure
    /// uniformly; log pipelines and alerts do not.
    fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Engine(EngineError::OversizedInput { .. }) => "oversized_input",
            ApiError::Engine(EngineError::UnreadablePdf(_)) => "unreadable_pdf",
            ApiError::Internal(_) => "internal_fault",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Engine(e @ EngineError::OversizedInput { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
            }
            ApiError::Engine(e @ EngineError::UnreadablePdf(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "error_kind": self.kind(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
