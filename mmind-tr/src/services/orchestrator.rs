//! Transcription orchestrator
//!
//! Sequences one transcription request:
//! lookup → claim (`pending → processing`) → delegate → store transcript →
//! mark `done` → derive and store summary.
//!
//! Any failure between the claim and `done` drives a best-effort `failed`
//! write before the error is returned. Summary storage failures never fail
//! the request; they are logged and returned as warnings.

use crate::error::TranscribeError;
use crate::services::store::RecordStore;
use crate::services::summary::derive_summary;
use crate::services::transcription_client::TranscriptionService;
use mmind_common::db::{AudioFile, NewTranscript, Summary, Transcript};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Warning returned when the summary could not be stored
pub const WARN_SUMMARY_NOT_STORED: &str = "Summary could not be stored";

/// Successful orchestration
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub transcript: Transcript,
    /// `None` when summary storage failed
    pub summary: Option<Summary>,
    pub warnings: Vec<String>,
}

/// Coordinates lookup, delegation and persistence for one audio file
pub struct TranscriptionOrchestrator {
    store: Arc<dyn RecordStore>,
    transcriber: Arc<dyn TranscriptionService>,
    timeout: Duration,
}

impl TranscriptionOrchestrator {
    /// # Arguments
    /// * `store` - Persistence collaborator
    /// * `transcriber` - Transcription collaborator
    /// * `timeout` - Upper bound on one delegated transcription call
    pub fn new(
        store: Arc<dyn RecordStore>,
        transcriber: Arc<dyn TranscriptionService>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            transcriber,
            timeout,
        }
    }

    /// Run the full pipeline for `audio_file_id`
    pub async fn transcribe(
        &self,
        audio_file_id: Option<&str>,
    ) -> Result<TranscriptionOutcome, TranscribeError> {
        let id = validate_id(audio_file_id)?;

        let audio_file = self.lookup(id).await?;
        self.claim(id).await?;

        info!(audio_file_id = %id, "Transcription started");

        let transcript = match self.transcribe_and_store(&audio_file).await {
            Ok(transcript) => transcript,
            Err(e) => {
                error!(audio_file_id = %id, "Transcription failed: {}", e);
                if let Err(mark_err) = self.store.mark_failed(id).await {
                    error!(audio_file_id = %id, "Failed to mark audio file failed: {}", mark_err);
                }
                return Err(e);
            }
        };

        let mut warnings = Vec::new();
        let content = derive_summary(&transcript.text);
        let summary = match self.store.insert_summary(id, &content).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(audio_file_id = %id, "Summary not stored: {}", e);
                warnings.push(WARN_SUMMARY_NOT_STORED.to_string());
                None
            }
        };

        info!(
            audio_file_id = %id,
            transcript_id = %transcript.id,
            "Transcription completed"
        );

        Ok(TranscriptionOutcome {
            transcript,
            summary,
            warnings,
        })
    }

    async fn lookup(&self, id: &str) -> Result<AudioFile, TranscribeError> {
        match self.store.get_audio_file(id).await {
            Ok(Some(audio_file)) => Ok(audio_file),
            Ok(None) => Err(TranscribeError::NotFound(format!("audio file {}", id))),
            Err(e) => {
                warn!(audio_file_id = %id, "Audio file lookup failed: {}", e);
                Err(TranscribeError::NotFound(format!("audio file {}: {}", id, e)))
            }
        }
    }

    async fn claim(&self, id: &str) -> Result<(), TranscribeError> {
        match self.store.claim_for_processing(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(TranscribeError::Conflict(format!(
                "audio file {} is not pending",
                id
            ))),
            Err(e) => Err(TranscribeError::PersistenceError(format!(
                "mark processing: {}",
                e
            ))),
        }
    }

    /// Steps whose failure leaves the audio file `failed`
    async fn transcribe_and_store(&self, audio_file: &AudioFile) -> Result<Transcript, TranscribeError> {
        let result = tokio::time::timeout(self.timeout, self.transcriber.transcribe_url(&audio_file.url))
            .await
            .map_err(|_| {
                TranscribeError::UpstreamFailure(format!(
                    "no response within {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| TranscribeError::UpstreamFailure(e.to_string()))?;

        let transcript = self
            .store
            .insert_transcript(NewTranscript {
                audio_id: audio_file.id.clone(),
                text: result.text,
                language: result.language,
                confidence_score: result.confidence_score,
                speakers_detected: result.speakers_detected,
            })
            .await
            .map_err(|e| TranscribeError::PersistenceError(format!("store transcript: {}", e)))?;

        self.store
            .mark_done(&audio_file.id, result.duration)
            .await
            .map_err(|e| TranscribeError::PersistenceError(format!("mark done: {}", e)))?;

        Ok(transcript)
    }
}

fn validate_id(audio_file_id: Option<&str>) -> Result<&str, TranscribeError> {
    match audio_file_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(TranscribeError::InvalidRequest(
            "audioFileId is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(Some("abc")).unwrap(), "abc");
        assert_eq!(validate_id(Some("  abc ")).unwrap(), "abc");
        assert!(matches!(validate_id(None), Err(TranscribeError::InvalidRequest(_))));
        assert!(matches!(validate_id(Some("")), Err(TranscribeError::InvalidRequest(_))));
        assert!(matches!(validate_id(Some("   ")), Err(TranscribeError::InvalidRequest(_))));
    }
}
