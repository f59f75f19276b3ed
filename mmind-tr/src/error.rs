//! Error types for mmind-tr
//!
//! `TranscribeError` is the closed set of orchestration failures; `ApiError`
//! is what leaves the process as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Public message for a missing or empty `audioFileId`
pub const MSG_ID_REQUIRED: &str = "Audio file ID is required";
/// Public message for an unknown audio file
pub const MSG_NOT_FOUND: &str = "Audio file not found";
/// Public message when the audio file is not in `pending`
pub const MSG_CONFLICT: &str = "Transcription already in progress or completed";
/// Public message for every other failure
pub const MSG_INTERNAL: &str = "Internal server error";

/// Orchestration failure
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Malformed or missing input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Referenced audio file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Audio file is not `pending` (already claimed or finished)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transcription service failed, timed out or returned garbage
    #[error("Transcription service failure: {0}")]
    UpstreamFailure(String),

    /// Store read or write failed
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// Anything uncategorized
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TranscribeError {
    /// HTTP status the failure is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscribeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TranscribeError::NotFound(_) => StatusCode::NOT_FOUND,
            TranscribeError::Conflict(_) => StatusCode::CONFLICT,
            TranscribeError::UpstreamFailure(_)
            | TranscribeError::PersistenceError(_)
            | TranscribeError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        match err {
            TranscribeError::InvalidRequest(_) => ApiError::BadRequest(MSG_ID_REQUIRED.to_string()),
            TranscribeError::NotFound(_) => ApiError::NotFound(MSG_NOT_FOUND.to_string()),
            TranscribeError::Conflict(_) => ApiError::Conflict(MSG_CONFLICT.to_string()),
            other => {
                tracing::error!("Transcription error: {}", other);
                ApiError::Internal(MSG_INTERNAL.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
