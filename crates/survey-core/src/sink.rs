//! Best-effort mirroring of stored responses into an external spreadsheet.
//!
//! The sink is never authoritative. Failures are reported to the caller, which
//! logs and discards them; a response counts as submitted once the store has
//! it, whatever happens here.

use std::fmt::Display;

use async_trait::async_trait;
use chrono::{Local, TimeZone};

use crate::domain::{Question, SurveyResponse};

mod google;

pub use google::{GoogleSheetsSink, ServiceAccount, SheetsConfig};

/// Why a row could not be appended.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// No credentials were configured, inline or on disk.
    #[error("spreadsheet sink is not configured: {0}")]
    MissingConfiguration(String),

    /// The credentials exist but could not be read or used.
    #[error("invalid spreadsheet credentials: {0}")]
    Credentials(String),

    /// The token endpoint refused the credentials.
    #[error("spreadsheet authentication failed: {0}")]
    Auth(String),

    /// The request never completed.
    #[error("spreadsheet request failed: {0}")]
    Network(String),

    /// The spreadsheet API answered with a non-success status.
    #[error("spreadsheet API rejected the row ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The request did not finish in time.
    #[error("spreadsheet request timed out")]
    TimedOut,
}

/// Somewhere a stored response can be copied to as a flat row of text.
#[async_trait]
pub trait SpreadsheetSink: Send + Sync {
    /// Appends one row after the last populated row.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] describing why the row was not appended.
    async fn append_row(&self, row: Vec<String>) -> Result<(), SinkError>;
}

/// The twelve spreadsheet columns for `record`, in sheet order.
///
/// Timestamp, name, email, the eight answer labels in question order, then
/// suggestions. Absent text becomes an empty cell. The timestamp is rendered
/// in the server's local time as `dd/mm/yyyy, HH:MM:SS`.
#[must_use]
pub fn sheet_row(record: &SurveyResponse) -> Vec<String> {
    sheet_row_in(record, &Local)
}

fn sheet_row_in<Tz>(record: &SurveyResponse, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let s = &record.submission;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut row = Vec::with_capacity(12);
    row.push(
        record
            .submitted_at
            .with_timezone(tz)
            .format("%d/%m/%Y, %H:%M:%S")
            .to_string(),
    );
    row.push(text(&s.name));
    row.push(text(&s.email));
    row.extend(Question::ALL.iter().map(|q| s.answer(*q).to_string()));
    row.push(text(&s.suggestions));
    row
}
