use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{ApiError, SurveyApi};
use crate::domain::{NewSurveyResponse, SurveyResponse};

#[derive(Debug, Deserialize)]
struct Submitted {
    data: SurveyResponse,
}

#[derive(Debug, Deserialize)]
struct Listing {
    surveys: Vec<SurveyResponse>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Vec<String>,
}

/// [`SurveyApi`] over HTTP against a running survey server.
#[derive(Debug, Clone)]
pub struct HttpSurveyApi {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSurveyApi {
    /// A client for the server at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn surveys_url(&self) -> String {
        format!("{}/surveys", self.base_url)
    }
}

async fn error_from(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    if status == StatusCode::BAD_REQUEST {
        ApiError::Rejected {
            fields: body.details,
        }
    } else {
        let message = if body.error.is_empty() {
            status.to_string()
        } else {
            body.error
        };
        ApiError::Server {
            status: status.as_u16(),
            message,
        }
    }
}

fn network(e: &reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

#[async_trait]
impl SurveyApi for HttpSurveyApi {
    async fn submit(&self, payload: &NewSurveyResponse) -> Result<SurveyResponse, ApiError> {
        tracing::debug!(url = %self.surveys_url(), "sending survey");
        let response = self
            .http
            .post(self.surveys_url())
            .json(payload)
            .send()
            .await
            .map_err(|e| network(&e))?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let body: Submitted = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.data)
    }

    async fn list(&self) -> Result<Vec<SurveyResponse>, ApiError> {
        let response = self
            .http
            .get(self.surveys_url())
            .send()
            .await
            .map_err(|e| network(&e))?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        let body: Listing = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.surveys)
    }
}
