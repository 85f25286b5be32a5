//! GPA Calculator API server.
//!
//! Accepts a transcript PDF upload and returns the parsed grade table,
//! the detected grading scale, and the GPA normalized onto a 5.0 scale.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use gpa_api::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gpa_api=info".parse()?)
                .add_directive("gpa_engine=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing GPA Calculator API...");
    let state = Arc::new(AppState::from_env());
    let app = app(state);

    // Parse bind address
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting GPA Calculator API on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
