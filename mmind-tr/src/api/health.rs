//! Health check endpoint
//!
//! Reports relay uptime together with the transcription service's own health.
//! Always answers 200; a sick transcription service shows up as "degraded".

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::services::ServiceHealth;
use crate::AppState;

/// Default bound on the upstream health probe
pub const UPSTREAM_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    /// Module name ("mmind-tr")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Health reported by the transcription service, if reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_service: Option<ServiceHealth>,
    /// Why the transcription service could not be checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription_service_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let upstream = tokio::time::timeout(state.health_timeout, state.transcriber.health()).await;

    let (transcription_service, transcription_service_error) = match upstream {
        Ok(Ok(health)) => (Some(health), None),
        Ok(Err(e)) => (None, Some(e.to_string())),
        Err(_) => (None, Some("health check timed out".to_string())),
    };

    let healthy = transcription_service
        .as_ref()
        .map(|h| h.model_loaded)
        .unwrap_or(false);

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        module: "mmind-tr".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        transcription_service,
        transcription_service_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
