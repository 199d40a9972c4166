// src/store/mod.rs
//! SQLite persistence for story sessions.
//!
//! One table, `sessions`. A record is inserted when a story is generated and
//! updated once more when the user reports their mood afterwards.

pub mod db;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::soundscape::Soundscape;
use crate::story::Classification;

pub use db::create_pool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),
}

/// A persisted interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub user_name: String,
    pub timestamp: DateTime<Utc>,
    pub emotional_state: Classification,
    pub story_content: String,
    pub soundscape: Soundscape,
    pub mood_before: i64,
    pub mood_after: Option<i64>,
}

impl SessionRecord {
    /// New record with a fresh id and the current time (microsecond precision,
    /// which is what the store keeps).
    pub fn new(
        user_name: impl Into<String>,
        emotional_state: Classification,
        story_content: impl Into<String>,
        soundscape: Soundscape,
        mood_before: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_name: user_name.into(),
            timestamp: Utc::now().trunc_subsecs(6),
            emotional_state,
            story_content: story_content.into(),
            soundscape,
            mood_before,
            mood_after: None,
        }
    }
}

/// A completed session as shown on the progress page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub timestamp: DateTime<Utc>,
    pub mood_before: i64,
    pub mood_after: i64,
    /// Serialized classification, exactly as stored
    pub emotional_state: String,
}

#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `sessions` table if it does not exist.
    pub async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_name TEXT,
                timestamp DATETIME,
                emotional_state TEXT,
                story_content TEXT,
                soundscape TEXT,
                mood_before INTEGER,
                mood_after INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a new record. A duplicate id fails on the primary key.
    pub async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let emotional_state = serde_json::to_string(&record.emotional_state)?;
        let soundscape = serde_json::to_string(&record.soundscape)?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_name, timestamp, emotional_state, story_content, soundscape, mood_before, mood_after)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_name)
        .bind(format_timestamp(&record.timestamp))
        .bind(emotional_state)
        .bind(&record.story_content)
        .bind(soundscape)
        .bind(record.mood_before)
        .bind(record.mood_after)
        .execute(&self.pool)
        .await?;

        debug!("Stored session {}", record.id);
        Ok(())
    }

    /// Set `mood_after` for a session. Returns the number of rows updated;
    /// an unknown id updates nothing and is not an error.
    pub async fn update_mood_after(&self, id: &str, mood_after: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE sessions SET mood_after = ? WHERE id = ?")
            .bind(mood_after)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected();
        debug!("mood_after update for {} touched {} rows", id, updated);
        Ok(updated)
    }

    /// Most recent completed sessions first. Rows whose timestamp cannot be
    /// read are skipped.
    pub async fn select_recent(&self, limit: i64) -> Result<Vec<ProgressEntry>, StoreError> {
        let rows: Vec<(String, i64, i64, String)> = sqlx::query_as(
            r#"
            SELECT timestamp, mood_before, mood_after, emotional_state
            FROM sessions
            WHERE mood_after IS NOT NULL
            ORDER BY timestamp DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|(timestamp, mood_before, mood_after, emotional_state)| {
                match parse_timestamp(&timestamp) {
                    Ok(timestamp) => Some(ProgressEntry {
                        timestamp,
                        mood_before,
                        mood_after,
                        emotional_state,
                    }),
                    Err(e) => {
                        warn!("Skipping session row: {}", e);
                        None
                    }
                }
            })
            .collect();
        Ok(entries)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// Fixed-width UTC text sorts chronologically.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Also reads the naive `YYYY-MM-DD HH:MM:SS.ffffff` form of older databases, as UTC.
fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(|_| StoreError::Timestamp(text.to_string()))
}
