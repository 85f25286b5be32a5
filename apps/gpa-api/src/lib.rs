//! GPA Calculator API - axum boundary in front of the transcript analysis
//! engine.
//!
//! Router construction lives here so integration tests can drive the
//! service through tower without binding a socket.

pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Per-request ceiling. The engine is synchronous and idempotent, so a
/// timed-out request is always safe to retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Headroom for multipart framing on top of the configured upload limit.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the application router with all middleware attached.
pub fn app(state: Arc<AppState>) -> Router {
    // CORS configuration for the upload UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_body = state.engine.config().max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/calculate-gpa", post(handlers::calculate_gpa))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .with_state(state)
}
