use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answers::{
    AcademyTime, EquipmentAvailability, ExperienceLevel, InstructorSupport, OverallSatisfaction,
    Question, ReceptionService, TrainingGuidance, TrainingSchedule,
};

/// A validated survey submission that has not been stored yet.
///
/// Produced by [`validate`](super::validate()); the store adds the `id` and
/// `submittedAt` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurveyResponse {
    /// Optional member name.
    pub name: Option<String>,
    /// Optional member e-mail. Never checked for format.
    pub email: Option<String>,
    /// Usual training time.
    pub training_schedule: TrainingSchedule,
    /// Self-assessed experience.
    pub experience_level: ExperienceLevel,
    /// Time as a member.
    pub academy_time: AcademyTime,
    /// Front desk rating.
    pub reception_service: ReceptionService,
    /// Instructor attention.
    pub instructor_support: InstructorSupport,
    /// Guidance and personalisation.
    pub training_guidance: TrainingGuidance,
    /// Equipment condition and availability.
    pub equipment_availability: EquipmentAvailability,
    /// Overall satisfaction.
    pub overall_satisfaction: OverallSatisfaction,
    /// Free-text comments.
    pub suggestions: Option<String>,
}

impl NewSurveyResponse {
    /// The wire label chosen for `question`.
    #[must_use]
    pub const fn answer(&self, question: Question) -> &'static str {
        match question {
            Question::TrainingSchedule => self.training_schedule.as_str(),
            Question::ExperienceLevel => self.experience_level.as_str(),
            Question::AcademyTime => self.academy_time.as_str(),
            Question::ReceptionService => self.reception_service.as_str(),
            Question::InstructorSupport => self.instructor_support.as_str(),
            Question::TrainingGuidance => self.training_guidance.as_str(),
            Question::EquipmentAvailability => self.equipment_availability.as_str(),
            Question::OverallSatisfaction => self.overall_satisfaction.as_str(),
        }
    }

    /// Assigns the server-side identity and timestamp.
    ///
    /// The timestamp is truncated to microseconds, the finest resolution every
    /// backend keeps, so the returned record matches what is read back later.
    #[must_use]
    pub fn into_stored(self) -> SurveyResponse {
        SurveyResponse {
            id: Uuid::new_v4(),
            submission: self,
            submitted_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// A stored survey response.
///
/// Immutable once written: there is no update or delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    /// Unique identifier, assigned on insert.
    pub id: Uuid,
    /// The validated answers.
    #[serde(flatten)]
    pub submission: NewSurveyResponse,
    /// When the response was persisted.
    pub submitted_at: DateTime<Utc>,
}
