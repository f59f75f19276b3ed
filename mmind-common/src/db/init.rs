//! Database initialization
//!
//! Opens (or creates) the SQLite database and creates the four tables used by
//! MeetingMind. Table creation is idempotent and safe on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Per-connection pragmas go through the connect options so that every
    // pooled connection gets them.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// In-memory database with the full schema
///
/// Limited to a single connection that is never recycled: every `:memory:`
/// connection is a separate database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_audio_files_table(pool).await?;
    create_transcripts_table(pool).await?;
    create_summaries_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_audio_files_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio_files (
            id TEXT PRIMARY KEY,
            user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
            url TEXT NOT NULL,
            transcription_status TEXT NOT NULL DEFAULT 'pending'
                CHECK (transcription_status IN ('pending', 'processing', 'done', 'failed')),
            duration REAL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_transcripts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transcripts (
            id TEXT PRIMARY KEY,
            audio_id TEXT NOT NULL REFERENCES audio_files(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            language TEXT NOT NULL,
            confidence_score REAL NOT NULL,
            speakers_detected INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_transcripts_audio_id ON transcripts(audio_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_summaries_table(pool: &SqlitePool) -> Result<()> {
    // List columns hold JSON arrays
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS summaries (
            id TEXT PRIMARY KEY,
            audio_id TEXT NOT NULL REFERENCES audio_files(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            highlights TEXT NOT NULL DEFAULT '[]',
            todo TEXT NOT NULL DEFAULT '[]',
            key_topics TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_summaries_audio_id ON summaries(audio_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database_has_all_tables() {
        let pool = init_memory_database().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["audio_files", "summaries", "transcripts", "users"]);
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let pool = init_memory_database().await.unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_status_check_constraint() {
        let pool = init_memory_database().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO audio_files (id, url, transcription_status) VALUES ('a', 'http://x', 'queued')",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "unknown status should violate CHECK constraint");
    }
}
