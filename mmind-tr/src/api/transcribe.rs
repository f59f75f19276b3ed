//! Transcription endpoint
//!
//! POST /api/transcribe with `{"audioFileId": "..."}`

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use mmind_common::db::Transcript;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiResult, TranscribeError};
use crate::AppState;

pub const MSG_COMPLETED: &str = "Transcription completed successfully";

/// Request body
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    #[serde(rename = "audioFileId", default)]
    pub audio_file_id: Option<String>,
}

/// Success body
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub success: bool,
    pub transcript: Transcript,
    pub message: String,
    /// Partial-success notes (e.g. summary not stored)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// POST /api/transcribe
///
/// The body is parsed as JSON whatever its Content-Type header says.
///
/// The pipeline runs on its own task so that a client disconnect cannot
/// abandon an audio file in `processing`; the delegated call is still bounded
/// by the orchestrator's timeout.
pub async fn transcribe(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<TranscribeResponse>> {
    let request: TranscribeRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected transcription request body: {}", e);
        TranscribeError::InvalidRequest(e.to_string())
    })?;

    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move {
        orchestrator
            .transcribe(request.audio_file_id.as_deref())
            .await
    })
    .await
    .map_err(|e| TranscribeError::InternalError(format!("transcription task: {}", e)))??;

    Ok(Json(TranscribeResponse {
        success: true,
        transcript: outcome.transcript,
        message: MSG_COMPLETED.to_string(),
        warnings: outcome.warnings,
    }))
}

/// Build transcription routes
pub fn transcribe_routes() -> Router<AppState> {
    Router::new().route("/api/transcribe", post(transcribe))
}
