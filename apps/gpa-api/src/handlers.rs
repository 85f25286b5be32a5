//! HTTP handlers for the GPA API.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use transcript_types::AnalysisResult;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Root probe used by the upload UI during setup.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "GPA Calculator API" }))
}

/// Analyze one uploaded transcript PDF.
///
/// Multipart form with a `file` field. Extraction failure aborts the whole
/// request; a missing grading scale or zero matched courses degrade to
/// data in the response body.
pub async fn calculate_gpa(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("transcript.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to read file: {}", e)))?;
            upload = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::InvalidRequest("No file provided".to_string()))?;

    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        return Err(ApiError::InvalidRequest(
            "Invalid file type. Please upload a PDF.".to_string(),
        ));
    }

    info!(%filename, size = bytes.len(), "analyzing transcript");
    let result = state.engine.analyze(&filename, &bytes)?;

    Ok(Json(result))
}
