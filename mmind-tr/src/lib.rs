//! mmind-tr library - Transcription Relay
//!
//! Accepts an audio-file reference over HTTP, delegates transcription to the
//! external transcription service, stores the transcript and a keyword summary.

pub mod api;
pub mod cli;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult, TranscribeError};

use axum::Router;
use chrono::{DateTime, Utc};
use services::{TranscriptionOrchestrator, TranscriptionService};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Request pipeline with its injected collaborators
    pub orchestrator: Arc<TranscriptionOrchestrator>,
    /// Transcription collaborator, queried by the health endpoint
    pub transcriber: Arc<dyn TranscriptionService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Upper bound on the transcription service health probe
    pub health_timeout: Duration,
}

impl AppState {
    pub fn new(
        orchestrator: TranscriptionOrchestrator,
        transcriber: Arc<dyn TranscriptionService>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            transcriber,
            startup_time: Utc::now(),
            health_timeout: api::health::UPSTREAM_CHECK_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::transcribe_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
