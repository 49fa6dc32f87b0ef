use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::DateTime;
use rusqlite::{params, Connection, Row};

use super::{StorageError, StoredRow, SurveyStore};
use crate::domain::{NewSurveyResponse, Question, SurveyResponse};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS surveys (
    seq                    INTEGER PRIMARY KEY AUTOINCREMENT,
    id                     TEXT NOT NULL UNIQUE,
    name                   TEXT,
    email                  TEXT,
    training_schedule      TEXT NOT NULL,
    experience_level       TEXT NOT NULL,
    academy_time           TEXT NOT NULL,
    reception_service      TEXT NOT NULL,
    instructor_support     TEXT NOT NULL,
    training_guidance      TEXT NOT NULL,
    equipment_availability TEXT NOT NULL,
    overall_satisfaction   TEXT NOT NULL,
    suggestions            TEXT,
    submitted_at           INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS surveys_newest_first ON surveys (submitted_at DESC, seq DESC);
";

const INSERT: &str = "
INSERT INTO surveys (
    id, name, email,
    training_schedule, experience_level, academy_time, reception_service,
    instructor_support, training_guidance, equipment_availability, overall_satisfaction,
    suggestions, submitted_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
";

const SELECT_ALL: &str = "
SELECT
    id, name, email,
    training_schedule, experience_level, academy_time, reception_service,
    instructor_support, training_guidance, equipment_availability, overall_satisfaction,
    suggestions, submitted_at
FROM surveys
ORDER BY submitted_at DESC, seq DESC
";

/// Durable store backed by a `SQLite` database.
///
/// Timestamps are stored as microseconds since the Unix epoch. Blocking
/// database calls run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path` and prepares the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the file cannot be opened, or
    /// [`StorageError::Query`] if the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StorageError::Unavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "opened sqlite survey store");
        Self::with_connection(conn)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the database cannot be created.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StorageError::Query(format!("schema setup failed: {e}")))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StorageError::Unavailable("connection lock poisoned".to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("sqlite worker failed: {e}")))?
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    let answer = |offset: usize| row.get::<_, String>(3 + offset);
    Ok(StoredRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        answers: [
            answer(0)?,
            answer(1)?,
            answer(2)?,
            answer(3)?,
            answer(4)?,
            answer(5)?,
            answer(6)?,
            answer(7)?,
        ],
        suggestions: row.get(11)?,
        submitted_at: DateTime::from_timestamp_micros(row.get(12)?),
    })
}

#[async_trait]
impl SurveyStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, response: NewSurveyResponse) -> Result<SurveyResponse, StorageError> {
        let stored = response.into_stored();
        let record = stored.clone();

        self.run(move |conn| {
            let s = &record.submission;
            let [a0, a1, a2, a3, a4, a5, a6, a7] = Question::ALL.map(|q| s.answer(q));
            conn.execute(
                INSERT,
                params![
                    record.id.to_string(),
                    s.name,
                    s.email,
                    a0,
                    a1,
                    a2,
                    a3,
                    a4,
                    a5,
                    a6,
                    a7,
                    s.suggestions,
                    record.submitted_at.timestamp_micros(),
                ],
            )
            .map_err(|e| StorageError::Query(e.to_string()))?;
            Ok(())
        })
        .await?;

        tracing::debug!(id = %stored.id, "stored survey in sqlite");
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        let rows = self
            .run(|conn| {
                let mut stmt = conn
                    .prepare_cached(SELECT_ALL)
                    .map_err(|e| StorageError::Query(e.to_string()))?;
                let rows = stmt
                    .query_map([], read_row)
                    .and_then(Iterator::collect::<rusqlite::Result<Vec<_>>>)
                    .map_err(|e| StorageError::Query(e.to_string()))?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(StoredRow::decode).collect()
    }
}
