//! Services for mmind-tr
//!
//! - `store`: persistence collaborator (`RecordStore`, `SqliteStore`)
//! - `transcription_client`: transcription collaborator (`TranscriptionService`, `WhisperClient`)
//! - `summary`: keyword summary deriver
//! - `orchestrator`: request pipeline tying the above together

pub mod orchestrator;
pub mod store;
pub mod summary;
pub mod transcription_client;

pub use orchestrator::{TranscriptionOrchestrator, TranscriptionOutcome};
pub use store::{RecordStore, SqliteStore};
pub use summary::derive_summary;
pub use transcription_client::{
    ServiceHealth, TranscriptionClientError, TranscriptionResult, TranscriptionSegment,
    TranscriptionService, WhisperClient,
};
