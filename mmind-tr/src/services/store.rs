//! Record store for audio files, transcripts and summaries
//!
//! Status updates are conditional on the current status so that only the
//! `pending → processing → {done | failed}` edges can ever be written.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mmind_common::db::{
    AudioFile, NewTranscript, Summary, SummaryContent, Transcript, TranscriptionStatus,
};
use mmind_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Persistence collaborator used by the orchestrator
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load an audio file by identifier
    async fn get_audio_file(&self, id: &str) -> Result<Option<AudioFile>>;

    /// Move `pending → processing`
    ///
    /// Returns `false` when the record is missing or not `pending`, in which
    /// case nothing was written.
    async fn claim_for_processing(&self, id: &str) -> Result<bool>;

    /// Insert a transcript row
    async fn insert_transcript(&self, transcript: NewTranscript) -> Result<Transcript>;

    /// Move `processing → done` and stamp the duration
    async fn mark_done(&self, id: &str, duration: f64) -> Result<()>;

    /// Move `processing → failed`
    async fn mark_failed(&self, id: &str) -> Result<()>;

    /// Insert a summary row for `audio_id`
    async fn insert_summary(&self, audio_id: &str, content: &SummaryContent) -> Result<Summary>;
}

/// SQLite-backed store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Register an uploaded audio file in `pending` state
    pub async fn create_audio_file(&self, url: &str, user_id: Option<&str>) -> Result<AudioFile> {
        let audio_file = AudioFile {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.map(str::to_string),
            url: url.to_string(),
            transcription_status: TranscriptionStatus::Pending,
            duration: None,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO audio_files (id, user_id, url, transcription_status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&audio_file.id)
        .bind(&audio_file.user_id)
        .bind(&audio_file.url)
        .bind(audio_file.transcription_status.as_str())
        .bind(audio_file.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(audio_file)
    }

    /// All transcripts for an audio file, oldest first
    pub async fn transcripts_for(&self, audio_id: &str) -> Result<Vec<Transcript>> {
        let rows = sqlx::query(
            r#"
            SELECT id, audio_id, text, language, confidence_score, speakers_detected, created_at
            FROM transcripts
            WHERE audio_id = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(audio_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(transcript_from_row).collect()
    }

    /// All summaries for an audio file, oldest first
    pub async fn summaries_for(&self, audio_id: &str) -> Result<Vec<Summary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, audio_id, text, highlights, todo, key_topics, created_at
            FROM summaries
            WHERE audio_id = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(audio_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(summary_from_row).collect()
    }

    async fn transition(
        &self,
        id: &str,
        from: TranscriptionStatus,
        to: TranscriptionStatus,
        duration: Option<f64>,
    ) -> Result<u64> {
        debug_assert!(from.can_transition_to(to));

        let result = sqlx::query(
            r#"
            UPDATE audio_files
            SET transcription_status = ?, duration = COALESCE(?, duration)
            WHERE id = ? AND transcription_status = ?
            "#,
        )
        .bind(to.as_str())
        .bind(duration)
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get_audio_file(&self, id: &str) -> Result<Option<AudioFile>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, url, transcription_status, duration, created_at
            FROM audio_files
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(audio_file_from_row).transpose()
    }

    async fn claim_for_processing(&self, id: &str) -> Result<bool> {
        let affected = self
            .transition(
                id,
                TranscriptionStatus::Pending,
                TranscriptionStatus::Processing,
                None,
            )
            .await?;
        Ok(affected == 1)
    }

    async fn insert_transcript(&self, new: NewTranscript) -> Result<Transcript> {
        let transcript = Transcript {
            id: Uuid::new_v4().to_string(),
            audio_id: new.audio_id,
            text: new.text,
            language: new.language,
            confidence_score: new.confidence_score,
            speakers_detected: new.speakers_detected,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO transcripts
                (id, audio_id, text, language, confidence_score, speakers_detected, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transcript.id)
        .bind(&transcript.audio_id)
        .bind(&transcript.text)
        .bind(&transcript.language)
        .bind(transcript.confidence_score)
        .bind(transcript.speakers_detected)
        .bind(transcript.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(transcript)
    }

    async fn mark_done(&self, id: &str, duration: f64) -> Result<()> {
        let affected = self
            .transition(
                id,
                TranscriptionStatus::Processing,
                TranscriptionStatus::Done,
                Some(duration),
            )
            .await?;
        if affected == 0 {
            return Err(Error::Internal(format!(
                "audio file {} is not processing, cannot mark done",
                id
            )));
        }
        Ok(())
    }

    async fn mark_failed(&self, id: &str) -> Result<()> {
        let affected = self
            .transition(
                id,
                TranscriptionStatus::Processing,
                TranscriptionStatus::Failed,
                None,
            )
            .await?;
        if affected == 0 {
            return Err(Error::Internal(format!(
                "audio file {} is not processing, cannot mark failed",
                id
            )));
        }
        Ok(())
    }

    async fn insert_summary(&self, audio_id: &str, content: &SummaryContent) -> Result<Summary> {
        let summary = Summary {
            id: Uuid::new_v4().to_string(),
            audio_id: audio_id.to_string(),
            text: content.text.clone(),
            highlights: content.highlights.clone(),
            todo: content.todo.clone(),
            key_topics: content.key_topics.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO summaries (id, audio_id, text, highlights, todo, key_topics, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&summary.id)
        .bind(&summary.audio_id)
        .bind(&summary.text)
        .bind(serde_json::to_string(&summary.highlights)?)
        .bind(serde_json::to_string(&summary.todo)?)
        .bind(serde_json::to_string(&summary.key_topics)?)
        .bind(summary.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(summary)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    // Rows written by other clients may use SQLite's CURRENT_TIMESTAMP format
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
        })
        .map_err(|e| Error::InvalidInput(format!("bad timestamp '{}': {}", value, e)))
}

fn audio_file_from_row(row: &SqliteRow) -> Result<AudioFile> {
    let status: String = row.try_get("transcription_status")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(AudioFile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        url: row.try_get("url")?,
        transcription_status: status.parse()?,
        duration: row.try_get("duration")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn transcript_from_row(row: &SqliteRow) -> Result<Transcript> {
    let created_at: String = row.try_get("created_at")?;

    Ok(Transcript {
        id: row.try_get("id")?,
        audio_id: row.try_get("audio_id")?,
        text: row.try_get("text")?,
        language: row.try_get("language")?,
        confidence_score: row.try_get("confidence_score")?,
        speakers_detected: row.try_get("speakers_detected")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<Summary> {
    let highlights: String = row.try_get("highlights")?;
    let todo: String = row.try_get("todo")?;
    let key_topics: String = row.try_get("key_topics")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Summary {
        id: row.try_get("id")?,
        audio_id: row.try_get("audio_id")?,
        text: row.try_get("text")?,
        highlights: serde_json::from_str(&highlights)?,
        todo: serde_json::from_str(&todo)?,
        key_topics: serde_json::from_str(&key_topics)?,
        created_at: parse_timestamp(&created_at)?,
    })
}
