use std::fmt::Write as _;

use chrono::Local;
use survey_core::{client::SurveyApi, SurveyResponse};

use crate::cli::terminal::{spinner, Colorize};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Show at most this many surveys
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Print the raw JSON records instead of a table
    #[arg(long)]
    json: bool,
}

impl Command {
    pub async fn run<A: SurveyApi>(self, api: A) -> anyhow::Result<()> {
        let progress = spinner("Loading surveys");
        let result = api.list().await;
        progress.finish_and_clear();

        let mut surveys = result?;
        if let Some(limit) = self.limit {
            surveys.truncate(limit);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&surveys)?);
            return Ok(());
        }

        if surveys.is_empty() {
            println!("{}", "No surveys yet.".dim());
            return Ok(());
        }

        print!("{}", table(&surveys));
        println!("{}", format!("{} survey(s)", surveys.len()).dim());
        Ok(())
    }
}

const SUGGESTION_WIDTH: usize = 40;

fn table(surveys: &[SurveyResponse]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:<20} {:<20} {:<18} {:<12} {}",
            "Submitted", "Name", "Satisfaction", "Reception", "Suggestions"
        )
        .heading()
    );
    for survey in surveys {
        let s = &survey.submission;
        let _ = writeln!(
            out,
            "{:<20} {:<20} {:<18} {:<12} {}",
            survey
                .submitted_at
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string(),
            truncate(s.name.as_deref().unwrap_or("-"), 20),
            s.overall_satisfaction.as_str(),
            s.reception_service.as_str(),
            truncate(s.suggestions.as_deref().unwrap_or(""), SUGGESTION_WIDTH),
        );
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut short: String = flat.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
