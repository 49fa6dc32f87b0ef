use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use survey_core::{
    client::{Draft, SubmissionFlow, SubmitFailure, SurveyApi},
    Question,
};

use crate::cli::terminal::{spinner, Colorize};

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Skip the optional name and e-mail prompts
    #[arg(long)]
    anonymous: bool,
}

impl Command {
    pub async fn run<A: SurveyApi>(self, api: A) -> anyhow::Result<()> {
        let theme = ColorfulTheme::default();
        let mut flow = SubmissionFlow::new(api);

        println!("{}", "Pesquisa de Satisfação".heading());
        println!(
            "{}",
            "Sua opinião nos ajuda a melhorar. Nome e e-mail são opcionais.".dim()
        );

        loop {
            self.edit(&theme, flow.draft_mut(), &Question::ALL)?;

            loop {
                let progress = spinner("Enviando...");
                let result = flow.submit().await;
                progress.finish_and_clear();

                match result {
                    Ok(stored) => {
                        println!("{}", "Survey submitted. Thank you for your feedback!".success());
                        println!("{}", format!("id {}", stored.id).dim());
                        break;
                    }
                    Err(failure) => {
                        eprintln!("{}", failure.message().warning());
                        if !confirm(&theme, "Try again?", true)? {
                            return Ok(());
                        }
                        if let SubmitFailure::InvalidData(fields) = &failure {
                            let pending: Vec<_> =
                                fields.iter().filter_map(|f| Question::from_key(f)).collect();
                            self.edit(&theme, flow.draft_mut(), &pending)?;
                        }
                    }
                }
            }

            if !confirm(&theme, "Submit another survey?", false)? {
                return Ok(());
            }
            flow.reset();
        }
    }

    /// Prompts for `questions`, then the free-text fields.
    ///
    /// Existing answers are offered as defaults, so re-editing a rejected
    /// draft only needs the missing ones changed.
    fn edit(
        &self,
        theme: &ColorfulTheme,
        draft: &mut Draft,
        questions: &[Question],
    ) -> anyhow::Result<()> {
        if !self.anonymous {
            draft.name = text(theme, "Nome (opcional)", &draft.name)?;
            draft.email = text(theme, "E-mail (opcional)", &draft.email)?;
        }

        for &question in questions {
            let options = question.options();
            let labels: Vec<&str> = options.iter().map(|(_, label)| *label).collect();
            let current = draft
                .answer(question)
                .and_then(|wire| options.iter().position(|(w, _)| *w == wire))
                .unwrap_or(0);

            println!("\n{}", question.title().heading());
            let selection = Select::with_theme(theme)
                .with_prompt(question.prompt())
                .items(&labels)
                .default(current)
                .interact()?;
            draft.set_answer(question, options[selection].0)?;
        }

        draft.suggestions = text(
            theme,
            "Sugestões, elogios ou críticas (opcional)",
            &draft.suggestions,
        )?;
        Ok(())
    }
}

fn text(theme: &ColorfulTheme, prompt: &str, current: &str) -> anyhow::Result<String> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn confirm(theme: &ColorfulTheme, prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
