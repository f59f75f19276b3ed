//! Database models
//!
//! Field names follow the column names so the JSON returned to clients
//! matches the stored rows.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transcription lifecycle of an audio file
///
/// Only `Pending → Processing → {Done | Failed}` is ever written by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::Pending => "pending",
            TranscriptionStatus::Processing => "processing",
            TranscriptionStatus::Done => "done",
            TranscriptionStatus::Failed => "failed",
        }
    }

    /// Whether `self → next` is a legal lifecycle edge
    pub fn can_transition_to(&self, next: TranscriptionStatus) -> bool {
        use TranscriptionStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Done) | (Processing, Failed)
        )
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranscriptionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TranscriptionStatus::Pending),
            "processing" => Ok(TranscriptionStatus::Processing),
            "done" => Ok(TranscriptionStatus::Done),
            "failed" => Ok(TranscriptionStatus::Failed),
            other => Err(Error::InvalidInput(format!(
                "unknown transcription status '{}'",
                other
            ))),
        }
    }
}

/// Uploaded audio resource (created by the upload flow, not by the relay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFile {
    pub id: String,
    pub user_id: Option<String>,
    pub url: String,
    pub transcription_status: TranscriptionStatus,
    /// Seconds; set only once the status reaches `done`
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Persisted transcription output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub audio_id: String,
    pub text: String,
    pub language: String,
    pub confidence_score: f64,
    pub speakers_detected: i64,
    pub created_at: DateTime<Utc>,
}

/// Transcript fields supplied by the caller on insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranscript {
    pub audio_id: String,
    pub text: String,
    pub language: String,
    pub confidence_score: f64,
    pub speakers_detected: i64,
}

/// Persisted summary of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: String,
    pub audio_id: String,
    pub text: String,
    pub highlights: Vec<String>,
    pub todo: Vec<String>,
    pub key_topics: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Derived summary content, before it is attached to an audio file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryContent {
    pub text: String,
    pub highlights: Vec<String>,
    pub todo: Vec<String>,
    pub key_topics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            TranscriptionStatus::Pending,
            TranscriptionStatus::Processing,
            TranscriptionStatus::Done,
            TranscriptionStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<TranscriptionStatus>().unwrap(), status);
        }
        assert!("queued".parse::<TranscriptionStatus>().is_err());
    }

    #[test]
    fn test_only_forward_edges_allowed() {
        use TranscriptionStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Done));
        assert!(Processing.can_transition_to(Failed));

        assert!(!Pending.can_transition_to(Done));
        assert!(!Done.can_transition_to(Processing));
        assert!(!Failed.can_transition_to(Processing));
        assert!(!Done.can_transition_to(Failed));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TranscriptionStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
