use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{
    validate, NewSurveyResponse, Question, SurveyResponse, UnknownOption, ValidationError, EMAIL,
    NAME, SUGGESTIONS,
};

mod http;

pub use http::HttpSurveyApi;

/// A failure talking to the survey API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server refused the payload as invalid.
    #[error("server rejected the survey: invalid {}", fields.join(", "))]
    Rejected {
        /// Offending field names, as reported by the server.
        fields: Vec<String>,
    },

    /// The server answered with an error status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error text from the response body.
        message: String,
    },

    /// The server could not be reached or the connection dropped.
    #[error("could not reach the survey server: {0}")]
    Network(String),

    /// The response body was not what the API promises.
    #[error("unexpected response from the survey server: {0}")]
    Decode(String),
}

/// The remote operations the submission flow needs.
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// Sends a validated submission and returns the stored record.
    async fn submit(&self, payload: &NewSurveyResponse) -> Result<SurveyResponse, ApiError>;

    /// Every stored response, newest first.
    async fn list(&self) -> Result<Vec<SurveyResponse>, ApiError>;
}

/// Form values being edited, before validation.
///
/// Text fields hold whatever was typed; blank text is sent as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Member name, optional.
    pub name: String,
    /// Member e-mail, optional.
    pub email: String,
    /// Free-text comments, optional.
    pub suggestions: String,
    answers: BTreeMap<Question, &'static str>,
}

impl Draft {
    /// Records the answer to `question` given its wire label.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownOption`] if `value` is not one of the question's
    /// labels. The previous answer, if any, is kept.
    pub fn set_answer(&mut self, question: Question, value: &str) -> Result<(), UnknownOption> {
        let label = question
            .options()
            .into_iter()
            .find_map(|(wire, _)| (wire == value).then_some(wire))
            .ok_or_else(|| UnknownOption(value.to_string()))?;
        self.answers.insert(question, label);
        Ok(())
    }

    /// Forgets the answer to `question`.
    pub fn clear_answer(&mut self, question: Question) {
        self.answers.remove(&question);
    }

    /// The current answer to `question`.
    #[must_use]
    pub fn answer(&self, question: Question) -> Option<&'static str> {
        self.answers.get(&question).copied()
    }

    /// Required questions without an answer yet, in form order.
    #[must_use]
    pub fn unanswered(&self) -> Vec<Question> {
        Question::ALL
            .into_iter()
            .filter(|q| !self.answers.contains_key(q))
            .collect()
    }

    /// The draft in the API's JSON shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert(NAME.to_string(), Value::String(self.name.clone()));
        object.insert(EMAIL.to_string(), Value::String(self.email.clone()));
        for (question, label) in &self.answers {
            object.insert(question.key().to_string(), Value::String((*label).to_string()));
        }
        object.insert(
            SUGGESTIONS.to_string(),
            Value::String(self.suggestions.clone()),
        );
        Value::Object(object)
    }

    /// Runs the same checks the server runs.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] the server would return.
    pub fn payload(&self) -> Result<NewSurveyResponse, ValidationError> {
        validate(&self.to_json())
    }
}

/// Why a submission attempt did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// Required answers are missing or invalid. Names the fields.
    InvalidData(Vec<String>),
    /// The server accepted the request but could not record it.
    Server(String),
    /// The server could not be reached.
    Network(String),
}

impl SubmitFailure {
    /// A message suitable for showing to the person filling the form.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidData(fields) if fields.is_empty() => {
                "The server rejected the survey data.".to_string()
            }
            Self::InvalidData(fields) => format!("Please fill in: {}", fields.join(", ")),
            Self::Server(_) => {
                "The server could not record the survey. Try again in a few minutes.".to_string()
            }
            Self::Network(detail) => format!("Could not reach the survey server ({detail})."),
        }
    }

    /// Whether the person can fix this by editing the form.
    #[must_use]
    pub const fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }
}

impl From<ValidationError> for SubmitFailure {
    fn from(e: ValidationError) -> Self {
        Self::InvalidData(e.fields().into_iter().map(str::to_string).collect())
    }
}

impl From<ApiError> for SubmitFailure {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Rejected { fields } => Self::InvalidData(fields),
            ApiError::Server { message, .. } => Self::Server(message),
            ApiError::Decode(detail) => Self::Server(detail),
            ApiError::Network(detail) => Self::Network(detail),
        }
    }
}

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// The draft can be edited and submitted.
    Editing,
    /// The server stored the survey; only a reset leaves this state.
    Submitted(SurveyResponse),
}

/// Client-side submission state machine.
///
/// `Editing` moves to `Submitted` on a successful submit. Failures leave the
/// draft untouched so it can be corrected and sent again. `reset` clears the
/// draft and returns to `Editing`.
#[derive(Debug)]
pub struct SubmissionFlow<A> {
    api: A,
    draft: Draft,
    state: FlowState,
}

impl<A: SurveyApi> SubmissionFlow<A> {
    /// Starts editing an empty draft.
    pub fn new(api: A) -> Self {
        Self {
            api,
            draft: Draft::default(),
            state: FlowState::Editing,
        }
    }

    /// The API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The draft being edited.
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access to the draft.
    pub const fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// The current state.
    pub const fn state(&self) -> &FlowState {
        &self.state
    }

    /// Validates the draft locally and, if it passes, sends it.
    ///
    /// Invalid drafts never reach the network. Once submitted, further calls
    /// return the stored record without sending anything.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitFailure`]; the draft is kept as it was.
    pub async fn submit(&mut self) -> Result<SurveyResponse, SubmitFailure> {
        if let FlowState::Submitted(stored) = &self.state {
            return Ok(stored.clone());
        }

        let payload = self.draft.payload()?;
        let stored = self.api.submit(&payload).await.inspect_err(|e| {
            tracing::warn!("survey submission failed: {e}");
        })?;
        tracing::info!(id = %stored.id, "survey submitted");
        self.state = FlowState::Submitted(stored.clone());
        Ok(stored)
    }

    /// Clears the draft and returns to editing.
    pub fn reset(&mut self) {
        self.draft = Draft::default();
        self.state = FlowState::Editing;
    }
}
