//! Shared fixtures for mmind-tr integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use mmind_common::db::{
    init_memory_database, AudioFile, NewTranscript, Summary, SummaryContent, Transcript,
};
use mmind_common::{Error, Result};
use mmind_tr::services::{
    RecordStore, ServiceHealth, SqliteStore, TranscriptionClientError, TranscriptionOrchestrator,
    TranscriptionResult, TranscriptionService,
};
use mmind_tr::{build_router, AppState};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const MEETING_TEXT: &str = "Welcome everyone. Today we discuss the project timeline. \
     Next we review the budget allocation. The project timeline needs adjustment.";

/// What the fake transcription service does when asked to transcribe
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed(TranscriptionResult),
    /// Respond after a delay
    SucceedAfter(Duration, TranscriptionResult),
    Fail(u16, String),
    /// Never respond
    Hang,
}

/// What the fake transcription service does when its health is checked
#[derive(Debug, Clone, Copy)]
pub enum Health {
    Reports { model_loaded: bool },
    Unreachable,
    /// Never respond
    Hang,
}

pub struct FakeTranscriber {
    behavior: Behavior,
    health: Health,
    calls: AtomicUsize,
}

impl FakeTranscriber {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            health: Health::Reports { model_loaded: true },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionService for FakeTranscriber {
    async fn transcribe_url(&self, _url: &str) -> std::result::Result<TranscriptionResult, TranscriptionClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Succeed(result) => Ok(result.clone()),
            Behavior::SucceedAfter(delay, result) => {
                tokio::time::sleep(*delay).await;
                Ok(result.clone())
            }
            Behavior::Fail(code, text) => Err(TranscriptionClientError::ApiError(*code, text.clone())),
            Behavior::Hang => std::future::pending().await,
        }
    }

    async fn health(&self) -> std::result::Result<ServiceHealth, TranscriptionClientError> {
        match self.health {
            Health::Reports { model_loaded } => Ok(ServiceHealth {
                status: if model_loaded { "healthy" } else { "loading" }.to_string(),
                model_loaded,
            }),
            Health::Unreachable => {
                Err(TranscriptionClientError::NetworkError("connection refused".to_string()))
            }
            Health::Hang => std::future::pending().await,
        }
    }
}

/// SQLite store with switchable failures
pub struct FlakyStore {
    inner: SqliteStore,
    pub fail_get_audio_file: AtomicBool,
    pub fail_claim: AtomicBool,
    pub fail_insert_transcript: AtomicBool,
    pub fail_mark_done: AtomicBool,
    pub fail_insert_summary: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: SqliteStore) -> Self {
        Self {
            inner,
            fail_get_audio_file: AtomicBool::new(false),
            fail_claim: AtomicBool::new(false),
            fail_insert_transcript: AtomicBool::new(false),
            fail_mark_done: AtomicBool::new(false),
            fail_insert_summary: AtomicBool::new(false),
        }
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(Error::Internal(format!("injected {} failure", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn get_audio_file(&self, id: &str) -> Result<Option<AudioFile>> {
        Self::check(&self.fail_get_audio_file, "audio file lookup")?;
        self.inner.get_audio_file(id).await
    }

    async fn claim_for_processing(&self, id: &str) -> Result<bool> {
        Self::check(&self.fail_claim, "claim")?;
        self.inner.claim_for_processing(id).await
    }

    async fn insert_transcript(&self, transcript: NewTranscript) -> Result<Transcript> {
        Self::check(&self.fail_insert_transcript, "transcript insert")?;
        self.inner.insert_transcript(transcript).await
    }

    async fn mark_done(&self, id: &str, duration: f64) -> Result<()> {
        Self::check(&self.fail_mark_done, "mark done")?;
        self.inner.mark_done(id, duration).await
    }

    async fn mark_failed(&self, id: &str) -> Result<()> {
        self.inner.mark_failed(id).await
    }

    async fn insert_summary(&self, audio_id: &str, content: &SummaryContent) -> Result<Summary> {
        Self::check(&self.fail_insert_summary, "summary insert")?;
        self.inner.insert_summary(audio_id, content).await
    }
}

pub fn meeting_result() -> TranscriptionResult {
    TranscriptionResult {
        text: MEETING_TEXT.to_string(),
        language: "en".to_string(),
        confidence_score: -0.25,
        speakers_detected: 2,
        segments: Vec::new(),
        duration: 93.5,
    }
}

/// Everything a test needs to drive and inspect the relay
pub struct TestApp {
    pub router: Router,
    pub db: SqliteStore,
    pub store: Arc<FlakyStore>,
    pub transcriber: Arc<FakeTranscriber>,
}

impl TestApp {
    pub async fn new(transcriber: FakeTranscriber) -> Self {
        Self::with_timeout(transcriber, Duration::from_secs(5)).await
    }

    pub async fn with_timeout(transcriber: FakeTranscriber, timeout: Duration) -> Self {
        let pool = init_memory_database().await.unwrap();
        let db = SqliteStore::new(pool);
        let store = Arc::new(FlakyStore::new(db.clone()));
        let transcriber = Arc::new(transcriber);

        let orchestrator = TranscriptionOrchestrator::new(store.clone(), transcriber.clone(), timeout);
        let state = AppState::new(orchestrator, transcriber.clone())
            .with_health_timeout(Duration::from_millis(200));
        let router = build_router(state);

        Self {
            router,
            db,
            store,
            transcriber,
        }
    }

    pub async fn pending_file(&self) -> AudioFile {
        self.db
            .create_audio_file("https://storage.example/audio/meeting.webm", None)
            .await
            .unwrap()
    }

    pub async fn audio_file(&self, id: &str) -> AudioFile {
        self.db.get_audio_file(id).await.unwrap().unwrap()
    }
}

pub fn transcribe_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/transcribe")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn transcribe_request_for(id: &str) -> Request<Body> {
    transcribe_request(serde_json::json!({ "audioFileId": id }).to_string())
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
