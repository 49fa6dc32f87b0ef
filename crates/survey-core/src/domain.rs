//! Domain model for survey responses.
//!
//! This module contains the closed answer sets for each question, the
//! submission and stored-record types, and the validator that turns untrusted
//! JSON into a [`NewSurveyResponse`].

/// Questions and their closed answer sets.
pub mod answers;
pub use answers::{
    AcademyTime, EquipmentAvailability, ExperienceLevel, InstructorSupport, OverallSatisfaction,
    Question, ReceptionService, TrainingGuidance, TrainingSchedule, UnknownOption,
};

mod response;
pub use response::{NewSurveyResponse, SurveyResponse};

mod schema;
pub use schema::{validate, FieldIssue, Problem, ValidationError, EMAIL, NAME, SUGGESTIONS};
