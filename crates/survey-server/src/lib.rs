//! HTTP front end for the gym survey.
//!
//! [`build_router`] wires the survey endpoints onto a [`SubmissionHandler`].
//! Every route is served both at the root and under `/api`.

use axum::{
    routing::{get, post},
    Router,
};
use survey_core::SubmissionHandler;

mod config;
mod http;

pub use config::{ConfigError, ServerConfig};

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    handler: SubmissionHandler,
}

impl AppState {
    /// Wraps a configured handler.
    #[must_use]
    pub const fn new(handler: SubmissionHandler) -> Self {
        Self { handler }
    }

    /// The submission handler.
    #[must_use]
    pub const fn handler(&self) -> &SubmissionHandler {
        &self.handler
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/surveys", post(http::submit_survey).get(http::list_surveys))
        .route("/health", get(http::health));

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .with_state(state)
}
