use std::{fmt, str::FromStr};

use serde_json::{Map, Value};

use super::{
    answers::{
        AcademyTime, EquipmentAvailability, ExperienceLevel, InstructorSupport,
        OverallSatisfaction, Question, ReceptionService, TrainingGuidance, TrainingSchedule,
    },
    response::NewSurveyResponse,
};

/// JSON field name of the optional member name.
pub const NAME: &str = "name";
/// JSON field name of the optional member e-mail.
pub const EMAIL: &str = "email";
/// JSON field name of the optional free-text comments.
pub const SUGGESTIONS: &str = "suggestions";

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A required answer is absent or `null`.
    Missing,
    /// The value is a string outside the question's answer set.
    NotAllowed(String),
    /// The value is not a JSON string.
    NotText,
}

/// A rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// JSON field name, e.g. `overallSatisfaction`.
    pub field: &'static str,
    /// Why the field was rejected.
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{} is required", self.field),
            Problem::NotAllowed(value) => {
                write!(f, "{} does not accept '{value}'", self.field)
            }
            Problem::NotText => write!(f, "{} must be text", self.field),
        }
    }
}

/// Untrusted input failed the survey schema.
///
/// Carries every offending field, not just the first one found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid survey data: {}", join(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// The individual field problems, in form order.
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Names of the offending fields, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    fn every_question_missing() -> Self {
        Self {
            issues: Question::ALL
                .into_iter()
                .map(|question| FieldIssue {
                    field: question.key(),
                    problem: Problem::Missing,
                })
                .collect(),
        }
    }
}

fn join(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks an untrusted payload against the survey schema.
///
/// Every required question must carry exactly one of its wire labels. `name`,
/// `email` and `suggestions` accept any string, `null`, or absence; blank
/// strings are treated as absent. Unknown fields are ignored.
///
/// This function is pure: it performs no I/O.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every offending field.
pub fn validate(raw: &Value) -> Result<NewSurveyResponse, ValidationError> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationError::every_question_missing());
    };

    let mut issues = Vec::new();

    let name = optional_text(object, NAME, &mut issues);
    let email = optional_text(object, EMAIL, &mut issues);
    let training_schedule =
        choice::<TrainingSchedule>(object, Question::TrainingSchedule, &mut issues);
    let experience_level =
        choice::<ExperienceLevel>(object, Question::ExperienceLevel, &mut issues);
    let academy_time = choice::<AcademyTime>(object, Question::AcademyTime, &mut issues);
    let reception_service =
        choice::<ReceptionService>(object, Question::ReceptionService, &mut issues);
    let instructor_support =
        choice::<InstructorSupport>(object, Question::InstructorSupport, &mut issues);
    let training_guidance =
        choice::<TrainingGuidance>(object, Question::TrainingGuidance, &mut issues);
    let equipment_availability =
        choice::<EquipmentAvailability>(object, Question::EquipmentAvailability, &mut issues);
    let overall_satisfaction =
        choice::<OverallSatisfaction>(object, Question::OverallSatisfaction, &mut issues);
    let suggestions = optional_text(object, SUGGESTIONS, &mut issues);

    let (
        true,
        Some(training_schedule),
        Some(experience_level),
        Some(academy_time),
        Some(reception_service),
        Some(instructor_support),
        Some(training_guidance),
        Some(equipment_availability),
        Some(overall_satisfaction),
    ) = (
        issues.is_empty(),
        training_schedule,
        experience_level,
        academy_time,
        reception_service,
        instructor_support,
        training_guidance,
        equipment_availability,
        overall_satisfaction,
    )
    else {
        return Err(ValidationError { issues });
    };

    Ok(NewSurveyResponse {
        name,
        email,
        training_schedule,
        experience_level,
        academy_time,
        reception_service,
        instructor_support,
        training_guidance,
        equipment_availability,
        overall_satisfaction,
        suggestions,
    })
}

fn choice<T: FromStr>(
    object: &Map<String, Value>,
    question: Question,
    issues: &mut Vec<FieldIssue>,
) -> Option<T> {
    let field = question.key();
    let problem = match object.get(field) {
        None | Some(Value::Null) => Problem::Missing,
        Some(Value::String(value)) => match value.parse() {
            Ok(answer) => return Some(answer),
            Err(_) => Problem::NotAllowed(value.clone()),
        },
        Some(_) => Problem::NotText,
    };
    issues.push(FieldIssue { field, problem });
    None
}

fn optional_text(
    object: &Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) if value.trim().is_empty() => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            issues.push(FieldIssue {
                field,
                problem: Problem::NotText,
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;
    use crate::domain::fixtures::valid_payload;

    #[test]
    fn accepts_the_reference_submission() {
        let response = validate(&valid_payload()).expect("payload should be valid");

        assert_eq!(response.training_schedule, TrainingSchedule::Morning);
        assert_eq!(
            response.overall_satisfaction,
            OverallSatisfaction::VerySatisfied
        );
        assert_eq!(response.name, None);
        assert_eq!(response.email, None);
        assert_eq!(response.suggestions, None);
    }

    #[test_case("trainingSchedule", json!("madrugada"); "unknown schedule")]
    #[test_case("experienceLevel", json!("expert"); "unknown level")]
    #[test_case("academyTime", json!(3); "number instead of label")]
    #[test_case("receptionService", json!(null); "null required field")]
    #[test_case("instructorSupport", json!("Sempre"); "labels are case sensitive")]
    #[test_case("trainingGuidance", json!("sempre"); "label from another question")]
    #[test_case("equipmentAvailability", json!(["sempre"]); "array")]
    #[test_case("overallSatisfaction", json!("nao-existe"); "nonexistent satisfaction")]
    fn rejects_a_bad_required_field(field: &str, value: Value) {
        let mut payload = valid_payload();
        payload[field] = value;

        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec![field]);
    }

    #[test]
    fn names_every_missing_field() {
        let mut payload = valid_payload();
        let object = payload.as_object_mut().unwrap();
        object.remove("academyTime");
        object.remove("overallSatisfaction");

        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["academyTime", "overallSatisfaction"]);
        assert!(err.issues().iter().all(|i| i.problem == Problem::Missing));
    }

    #[test]
    fn reports_the_rejected_value() {
        let mut payload = valid_payload();
        payload["overallSatisfaction"] = json!("nao-existe");

        let err = validate(&payload).unwrap_err();
        assert_eq!(
            err.issues(),
            &[FieldIssue {
                field: "overallSatisfaction",
                problem: Problem::NotAllowed("nao-existe".to_string()),
            }]
        );
        assert_eq!(
            err.to_string(),
            "invalid survey data: overallSatisfaction does not accept 'nao-existe'"
        );
    }

    #[test]
    fn message_lists_every_issue() {
        let mut payload = valid_payload();
        payload["name"] = json!(42);
        payload.as_object_mut().unwrap().remove("academyTime");

        let err = validate(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid survey data: name must be text; academyTime is required"
        );
    }

    #[test_case(json!(null); "null")]
    #[test_case(json!("survey"); "string")]
    #[test_case(json!([1, 2]); "array")]
    #[test_case(json!({}); "empty object")]
    fn non_survey_shapes_miss_every_question(raw: Value) {
        let err = validate(&raw).unwrap_err();
        let expected: Vec<_> = Question::ALL.iter().map(|q| q.key()).collect();
        assert_eq!(err.fields(), expected);
    }

    #[test]
    fn optional_text_is_free_form() {
        let mut payload = valid_payload();
        payload["name"] = json!("Ana");
        payload["email"] = json!("definitely not an e-mail");
        payload["suggestions"] = json!("Mais horários à noite\ne aulas de yoga");

        let response = validate(&payload).unwrap();
        assert_eq!(response.name.as_deref(), Some("Ana"));
        assert_eq!(response.email.as_deref(), Some("definitely not an e-mail"));
        assert_eq!(
            response.suggestions.as_deref(),
            Some("Mais horários à noite\ne aulas de yoga")
        );
    }

    #[test]
    fn blank_optional_text_is_absent() {
        let mut payload = valid_payload();
        payload["name"] = json!("");
        payload["email"] = json!("   ");
        payload["suggestions"] = json!(null);

        let response = validate(&payload).unwrap();
        assert_eq!(response.name, None);
        assert_eq!(response.email, None);
        assert_eq!(response.suggestions, None);
    }

    #[test]
    fn optional_text_must_still_be_text() {
        let mut payload = valid_payload();
        payload["email"] = json!(42);
        payload["overallSatisfaction"] = json!("nao-existe");

        let err = validate(&payload).unwrap_err();
        assert_eq!(err.fields(), vec!["email", "overallSatisfaction"]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut payload = valid_payload();
        payload["id"] = json!("client-chosen");
        payload["submittedAt"] = json!("yesterday");

        assert!(validate(&payload).is_ok());
    }
}
