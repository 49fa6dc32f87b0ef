use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use survey_core::{SubmitError, SurveyResponse};

use crate::AppState;

const SUBMITTED: &str = "survey submitted";
const INVALID: &str = "invalid data";
const SAVE_FAILED: &str = "could not save the survey, please try again later";
const LIST_FAILED: &str = "could not load surveys";

#[derive(Serialize)]
struct Submitted<'a> {
    success: bool,
    message: &'static str,
    data: &'a SurveyResponse,
}

#[derive(Serialize)]
struct Listing<'a> {
    surveys: &'a [SurveyResponse],
}

#[derive(Serialize)]
struct Invalid<'a> {
    error: &'static str,
    details: &'a [&'a str],
}

#[derive(Serialize)]
struct Failure {
    error: &'static str,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    store: &'static str,
}

fn invalid(fields: &[&str]) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(Invalid {
            error: INVALID,
            details: fields,
        }),
    )
        .into_response()
}

fn internal(error: &'static str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(Failure { error })).into_response()
}

pub(crate) async fn submit_survey(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let raw = match body {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            tracing::info!("unreadable survey body: {rejection}");
            return invalid(&[]);
        }
    };

    match state.handler().submit(&raw).await {
        Ok(stored) => Json(Submitted {
            success: true,
            message: SUBMITTED,
            data: &stored,
        })
        .into_response(),
        Err(SubmitError::Invalid(e)) => invalid(&e.fields()),
        Err(SubmitError::Storage(e)) => {
            tracing::error!("survey submission failed: {e}");
            internal(SAVE_FAILED)
        }
    }
}

pub(crate) async fn list_surveys(State(state): State<AppState>) -> Response {
    match state.handler().list().await {
        Ok(surveys) => Json(Listing { surveys: &surveys }).into_response(),
        Err(e) => {
            tracing::error!("listing surveys failed: {e}");
            internal(LIST_FAILED)
        }
    }
}

pub(crate) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(Health {
        status: "ok",
        store: state.handler().store().backend_tag(),
    })
}
