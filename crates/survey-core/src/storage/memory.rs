use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageError, SurveyStore};
use crate::domain::{NewSurveyResponse, SurveyResponse};

/// Transient in-process store, for tests and offline demos.
///
/// Each instance is independent; construct one and hand it to the handler.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SurveyResponse>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored responses.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, response: NewSurveyResponse) -> Result<SurveyResponse, StorageError> {
        let stored = response.into_stored();
        self.records.write().await.push(stored.clone());
        tracing::debug!(id = %stored.id, "stored survey in memory");
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        // newest insertion first, then a stable sort keeps that order on ties
        let mut all: Vec<_> = self.records.read().await.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(all)
    }
}
