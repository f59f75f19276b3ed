//! Transcription service client
//!
//! The transcription engine runs as a separate HTTP service (Whisper behind a
//! small web API). It exposes:
//! - `POST /transcribe-url` with JSON `{"url": ...}`
//! - `POST /transcribe` with a multipart `file` part
//! - `GET /health`
//!
//! Non-2xx responses are failures carrying the HTTP status text.

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("MeetingMind/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Transcription client errors
#[derive(Debug, Error)]
pub enum TranscriptionClientError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Transcription failed: {1} ({0})")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One timed segment of a transcription
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscriptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub confidence: f64,
}

/// Result of transcribing one audio resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub language: String,
    pub confidence_score: f64,
    pub speakers_detected: i64,
    #[serde(default)]
    pub segments: Vec<TranscriptionSegment>,
    /// Seconds
    pub duration: f64,
}

/// Transcription service health report
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceHealth {
    pub status: String,
    pub model_loaded: bool,
}

/// Transcription collaborator
///
/// Implemented by [`WhisperClient`] in production and by fakes in tests.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe the audio resource located at `url`
    ///
    /// May take minutes for long recordings; callers bound it with a timeout.
    async fn transcribe_url(&self, url: &str) -> Result<TranscriptionResult, TranscriptionClientError>;

    /// Report the service's health
    async fn health(&self) -> Result<ServiceHealth, TranscriptionClientError>;
}

#[derive(Serialize)]
struct TranscribeUrlRequest<'a> {
    url: &'a str,
}

/// HTTP client for the Whisper transcription service
#[derive(Debug, Clone)]
pub struct WhisperClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl WhisperClient {
    /// Create a client for the service at `base_url` (e.g. `http://localhost:8000`)
    ///
    /// No overall request timeout is set here: transcription time scales with
    /// audio length, and the orchestrator applies its own bound.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TranscriptionClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TranscriptionClientError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload audio bytes directly instead of passing a URL
    pub async fn transcribe_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| TranscriptionClientError::ParseError(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(file_name = %file_name, "Uploading audio to transcription service");

        let response = self
            .http_client
            .post(format!("{}/transcribe", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionClientError::NetworkError(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TranscriptionClientError> {
        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string();
            return Err(TranscriptionClientError::ApiError(status.as_u16(), status_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TranscriptionClientError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TranscriptionService for WhisperClient {
    async fn transcribe_url(&self, url: &str) -> Result<TranscriptionResult, TranscriptionClientError> {
        tracing::debug!(url = %url, "Requesting transcription by URL");

        let response = self
            .http_client
            .post(format!("{}/transcribe-url", self.base_url))
            .json(&TranscribeUrlRequest { url })
            .send()
            .await
            .map_err(|e| TranscriptionClientError::NetworkError(e.to_string()))?;

        let result: TranscriptionResult = Self::decode(response).await?;

        tracing::info!(
            language = %result.language,
            duration = result.duration,
            segments = result.segments.len(),
            "Transcription service returned result"
        );

        Ok(result)
    }

    async fn health(&self) -> Result<ServiceHealth, TranscriptionClientError> {
        let response = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| TranscriptionClientError::NetworkError(e.to_string()))?;

        Self::decode(response).await
    }
}
