use anyhow::Context;
use survey_core::{
    client::{Draft, SubmissionFlow, SurveyApi},
    Question,
};

use crate::cli::terminal::Colorize;

/// Answers are given by their wire labels; `survey questions` lists them.
#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Member name
    #[arg(long)]
    name: Option<String>,

    /// Member e-mail
    #[arg(long)]
    email: Option<String>,

    /// Usual training time
    #[arg(long)]
    training_schedule: Option<String>,

    /// Experience level
    #[arg(long)]
    experience_level: Option<String>,

    /// Time as a member
    #[arg(long)]
    academy_time: Option<String>,

    /// Front desk rating
    #[arg(long)]
    reception_service: Option<String>,

    /// Instructor attention
    #[arg(long)]
    instructor_support: Option<String>,

    /// Guidance and personalisation
    #[arg(long)]
    training_guidance: Option<String>,

    /// Equipment condition and availability
    #[arg(long)]
    equipment_availability: Option<String>,

    /// Overall satisfaction
    #[arg(long)]
    overall_satisfaction: Option<String>,

    /// Free-text comments
    #[arg(long)]
    suggestions: Option<String>,
}

impl Command {
    fn answers(&self) -> [(Question, Option<&str>); 8] {
        [
            (Question::TrainingSchedule, self.training_schedule.as_deref()),
            (Question::ExperienceLevel, self.experience_level.as_deref()),
            (Question::AcademyTime, self.academy_time.as_deref()),
            (Question::ReceptionService, self.reception_service.as_deref()),
            (Question::InstructorSupport, self.instructor_support.as_deref()),
            (Question::TrainingGuidance, self.training_guidance.as_deref()),
            (
                Question::EquipmentAvailability,
                self.equipment_availability.as_deref(),
            ),
            (
                Question::OverallSatisfaction,
                self.overall_satisfaction.as_deref(),
            ),
        ]
    }

    /// Builds the draft these flags describe.
    fn draft(&self) -> anyhow::Result<Draft> {
        let mut draft = Draft::default();
        draft.name = self.name.clone().unwrap_or_default();
        draft.email = self.email.clone().unwrap_or_default();
        draft.suggestions = self.suggestions.clone().unwrap_or_default();
        for (question, value) in self.answers() {
            if let Some(value) = value {
                draft.set_answer(question, value).with_context(|| {
                    format!("--{} has no answer '{value}'", super::questions::flag_name(question))
                })?;
            }
        }
        Ok(draft)
    }

    pub async fn run<A: SurveyApi>(self, api: A) -> anyhow::Result<()> {
        let mut flow = SubmissionFlow::new(api);
        *flow.draft_mut() = self.draft()?;

        match flow.submit().await {
            Ok(stored) => {
                println!("{}", "Survey submitted.".success());
                println!("{}", format!("id {}", stored.id).dim());
                Ok(())
            }
            Err(failure) => anyhow::bail!(failure.message()),
        }
    }
}
