//! Core types and logic for gym satisfaction surveys.
//!
//! This crate validates untrusted survey submissions, persists them through a
//! pluggable store, mirrors them to a spreadsheet on a best-effort basis, and
//! drives the client-side submission flow.

/// Domain types, the closed answer sets and the validator.
pub mod domain;
pub use domain::{
    validate, FieldIssue, NewSurveyResponse, Problem, Question, SurveyResponse, ValidationError,
};

/// Persistence gateway and its backends.
pub mod storage;
pub use storage::{MemoryStore, PostgresStore, SqliteStore, StorageError, StoreConfig, SurveyStore};

/// Auxiliary spreadsheet mirror.
pub mod sink;
pub use sink::{sheet_row, GoogleSheetsSink, SheetsConfig, SinkError, SpreadsheetSink};

mod handler;
pub use handler::{SubmissionHandler, SubmitError};

/// Client-side draft state and the HTTP client for the survey API.
pub mod client;
