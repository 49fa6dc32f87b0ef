use std::{sync::Arc, time::Duration};

use serde_json::Value;

use crate::{
    domain::{validate, SurveyResponse, ValidationError},
    sink::{sheet_row, SinkError, SpreadsheetSink},
    storage::{StorageError, SurveyStore},
};

/// Why a submission was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The payload failed validation. Nothing was stored.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The store failed. Nothing was stored and the mirror was not attempted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validates, persists and mirrors survey submissions.
///
/// Cheap to clone; every clone shares the same store and mirror.
#[derive(Clone)]
pub struct SubmissionHandler {
    store: Arc<dyn SurveyStore>,
    mirror: Option<Mirror>,
}

#[derive(Clone)]
struct Mirror {
    sink: Arc<dyn SpreadsheetSink>,
    timeout: Duration,
}

impl std::fmt::Debug for SubmissionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionHandler")
            .field("store", &self.store.backend_tag())
            .field("mirror", &self.mirror.as_ref().map(|m| m.timeout))
            .finish()
    }
}

impl SubmissionHandler {
    /// A handler that persists to `store` and mirrors nowhere.
    #[must_use]
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self {
            store,
            mirror: None,
        }
    }

    /// Mirrors every stored response to `sink`, giving each attempt at most
    /// `timeout`.
    #[must_use]
    pub fn with_mirror(mut self, sink: Arc<dyn SpreadsheetSink>, timeout: Duration) -> Self {
        self.mirror = Some(Mirror { sink, timeout });
        self
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SurveyStore> {
        &self.store
    }

    /// Whether a spreadsheet mirror is attached.
    #[must_use]
    pub const fn mirrors(&self) -> bool {
        self.mirror.is_some()
    }

    /// Validates `raw`, stores it, then mirrors the stored record.
    ///
    /// The mirror outcome never changes the result: once the store accepts
    /// the record, this returns it.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] when `raw` fails validation,
    /// [`SubmitError::Storage`] when the store rejects the write.
    pub async fn submit(&self, raw: &Value) -> Result<SurveyResponse, SubmitError> {
        let submission = validate(raw).inspect_err(|e| {
            tracing::info!(fields = ?e.fields(), "rejected survey submission");
        })?;

        let stored = self.store.insert(submission).await.inspect_err(|e| {
            tracing::error!(backend = self.store.backend_tag(), "failed to store survey: {e}");
        })?;
        tracing::info!(id = %stored.id, "survey stored");

        if let Some(mirror) = &self.mirror {
            mirror.copy(&stored).await;
        }

        Ok(stored)
    }

    /// Every stored response, newest first.
    ///
    /// # Errors
    ///
    /// Returns the store's [`StorageError`] unchanged.
    pub async fn list(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        self.store.list_all().await
    }
}

impl Mirror {
    async fn copy(&self, record: &SurveyResponse) {
        if let Err(e) = self.attempt(record).await {
            tracing::warn!(
                id = %record.id,
                timeout = ?self.timeout,
                "spreadsheet mirror failed: {e}"
            );
        }
    }

    async fn attempt(&self, record: &SurveyResponse) -> Result<(), SinkError> {
        tokio::time::timeout(self.timeout, self.sink.append_row(sheet_row(record)))
            .await
            .unwrap_or(Err(SinkError::TimedOut))
    }
}
