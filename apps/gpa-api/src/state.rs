//! Application state for the GPA API.

use gpa_engine::{EngineConfig, GpaEngine};

pub struct AppState {
    pub engine: GpaEngine,
}

impl AppState {
    /// Build state from the environment, falling back to engine defaults.
    ///
    /// Recognized variables: `GPA_API_MAX_UPLOAD_BYTES`, `GPA_API_MAX_PAGES`.
    pub fn from_env() -> Self {
        let mut config = EngineConfig::default();
        if let Some(bytes) = env_usize("GPA_API_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = bytes;
        }
        if let Some(pages) = env_usize("GPA_API_MAX_PAGES") {
            config.max_pages = pages;
        }

        tracing::info!(
            max_upload_bytes = config.max_upload_bytes,
            max_pages = config.max_pages,
            "engine configured"
        );

        Self::with_config(config)
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: GpaEngine::new(config),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
