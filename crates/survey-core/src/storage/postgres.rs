use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::{NoTls, Row, types::ToSql};

use super::{StorageError, StoredRow, SurveyStore};
use crate::domain::{NewSurveyResponse, Question, SurveyResponse};

/// Matches the `surveys` table written by earlier deployments of the
/// service, so an existing database is adopted rather than replaced.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS surveys (
    id                     VARCHAR PRIMARY KEY,
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
    submitted_at           TIMESTAMPTZ NOT NULL DEFAULT now()
);
ALTER TABLE surveys ADD COLUMN IF NOT EXISTS seq BIGSERIAL;
CREATE INDEX IF NOT EXISTS surveys_newest_first ON surveys (submitted_at DESC, seq DESC);
";

const TIMESTAMP_TYPE: &str = "
SELECT data_type::text
FROM information_schema.columns
WHERE table_schema = current_schema() AND table_name = 'surveys' AND column_name = 'submitted_at'
";

const INSERT: &str = "
INSERT INTO surveys (
    id, name, email,
    training_schedule, experience_level, academy_time, reception_service,
    instructor_support, training_guidance, equipment_availability, overall_satisfaction,
    suggestions, submitted_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
";

const SELECT_ALL: &str = "
SELECT
    id::text, name, email,
    training_schedule, experience_level, academy_time, reception_service,
    instructor_support, training_guidance, equipment_availability, overall_satisfaction,
    suggestions, submitted_at
FROM surveys
ORDER BY submitted_at DESC, seq DESC
";

/// How the `submitted_at` column stores instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clock {
    /// `TIMESTAMPTZ`.
    Zoned,
    /// `TIMESTAMP` without time zone, holding UTC wall-clock time.
    Naive,
}

impl Clock {
    fn from_data_type(data_type: &str) -> Self {
        if data_type == "timestamp without time zone" {
            Self::Naive
        } else {
            Self::Zoned
        }
    }
}

/// Durable store backed by a pooled `PostgreSQL` connection.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool,
    clock: Clock,
}

impl PostgresStore {
    /// Builds a connection pool for `url`, checks that the server is
    /// reachable and creates or upgrades the schema.
    ///
    /// An existing `surveys` table gains the `seq` ordering column; its
    /// `submitted_at` may be either `TIMESTAMPTZ` or `TIMESTAMP` (read as UTC).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the pool cannot be created or
    /// the server cannot be reached, and [`StorageError::Query`] if the schema
    /// cannot be created.
    pub async fn connect(url: &str, max_connections: usize) -> Result<Self, StorageError> {
        let mut cfg = Config::new();
        cfg.url = Some(url.to_string());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(max_connections.max(1)));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| StorageError::Unavailable(format!("pool creation failed: {e}")))?;

        let client = pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(format!("connection test failed: {e}")))?;
        client
            .batch_execute(SCHEMA)
            .await
            .map_err(|e| StorageError::Query(format!("schema setup failed: {e}")))?;
        let data_type: String = client
            .query_one(TIMESTAMP_TYPE, &[])
            .await
            .and_then(|row| row.try_get(0))
            .map_err(|e| StorageError::Query(format!("schema inspection failed: {e}")))?;
        let clock = Clock::from_data_type(&data_type);

        tracing::info!(max_connections, ?clock, "postgres survey store connected");
        Ok(Self { pool, clock })
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, StorageError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

fn read_row(row: &Row, clock: Clock) -> Result<StoredRow, tokio_postgres::Error> {
    let answer = |offset: usize| row.try_get::<_, String>(3 + offset);
    let submitted_at = match clock {
        Clock::Zoned => row.try_get::<_, DateTime<Utc>>(12)?,
        Clock::Naive => row.try_get::<_, NaiveDateTime>(12)?.and_utc(),
    };
    Ok(StoredRow {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        email: row.try_get(2)?,
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
        suggestions: row.try_get(11)?,
        submitted_at: Some(submitted_at),
    })
}

#[async_trait]
impl SurveyStore for PostgresStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, response: NewSurveyResponse) -> Result<SurveyResponse, StorageError> {
        let stored = response.into_stored();
        let s = &stored.submission;
        let id = stored.id.to_string();
        let [a0, a1, a2, a3, a4, a5, a6, a7] = Question::ALL.map(|q| s.answer(q));
        let naive = stored.submitted_at.naive_utc();
        let submitted_at: &(dyn ToSql + Sync) = match self.clock {
            Clock::Zoned => &stored.submitted_at,
            Clock::Naive => &naive,
        };

        let client = self.client().await?;
        client
            .execute(
                INSERT,
                &[
                    &id,
                    &s.name,
                    &s.email,
                    &a0,
                    &a1,
                    &a2,
                    &a3,
                    &a4,
                    &a5,
                    &a6,
                    &a7,
                    &s.suggestions,
                    submitted_at,
                ],
            )
            .await
            .map_err(|e| {
                tracing::error!(id = %stored.id, "failed to insert survey: {e}");
                StorageError::Query(e.to_string())
            })?;

        tracing::debug!(id = %stored.id, "stored survey in postgres");
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        let client = self.client().await?;
        let rows = client
            .query(SELECT_ALL, &[])
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                read_row(row, self.clock)
                    .map_err(|e| StorageError::Query(e.to_string()))
                    .and_then(StoredRow::decode)
            })
            .collect()
    }
}
