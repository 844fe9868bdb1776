//! libsql-backed questions log.
//!
//! Every processed query is recorded here with the label of the pipeline
//! that answered it. Backed by remote Turso when configured, a local SQLite
//! file otherwise, and an in-memory database in tests.

use chrono::DateTime;
use libsql::{Builder, Connection, Database};

use crate::types::{AppError, QuestionRecord, Result};
use crate::utils::config::DatabaseConfig;

/// Client for the questions log.
///
/// Holds a single connection opened at build time so that in-memory
/// databases keep their state across operations.
pub struct TursoClient {
    conn: Connection,
}

impl TursoClient {
    /// Connects according to configuration: remote Turso when both URL and
    /// auth token are present, the local file path otherwise.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        match (&config.turso_url, &config.turso_auth_token) {
            (Some(url), Some(token)) => Self::new_remote(url.clone(), token.clone()).await,
            _ => Self::new_local(&config.local_path).await,
        }
    }

    /// Connects to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {e}")))?;

        Self::from_database(db).await
    }

    /// Opens (creating if needed) a local SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open local database: {e}")))?;

        Self::from_database(db).await
    }

    /// Opens an in-memory database. Intended for tests.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {e}")))?;

        let client = Self { conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    /// Returns a handle to the underlying connection.
    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS questions (
                    id TEXT PRIMARY KEY,
                    question TEXT NOT NULL,
                    response TEXT NOT NULL,
                    agent TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create questions table: {e}")))?;

        Ok(())
    }

    /// Inserts one question/answer record.
    pub async fn insert_question(&self, record: &QuestionRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO questions (id, question, response, agent, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    record.id.as_str(),
                    record.question.as_str(),
                    record.response.as_str(),
                    record.agent.as_str(),
                    record.created_at.timestamp(),
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert question: {e}")))?;

        Ok(())
    }

    /// Returns the most recent records, newest first.
    pub async fn recent_questions(&self, limit: usize) -> Result<Vec<QuestionRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, question, response, agent, created_at FROM questions
                 ORDER BY created_at DESC, rowid DESC LIMIT ?",
                [limit as i64],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query questions: {e}")))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let created_ts: i64 = row.get(4).map_err(|e| AppError::Database(e.to_string()))?;
            records.push(QuestionRecord {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                question: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                response: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                agent: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: DateTime::from_timestamp(created_ts, 0).ok_or_else(|| {
                    AppError::Database(format!("Invalid stored timestamp {created_ts}"))
                })?,
            });
        }

        Ok(records)
    }
}
