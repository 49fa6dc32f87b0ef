use survey_core::Question;

use crate::cli::terminal::Colorize;

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Print only the JSON field names and their accepted values
    #[arg(long)]
    keys_only: bool,
}

impl Command {
    pub fn run(self) {
        for (i, question) in Question::ALL.into_iter().enumerate() {
            if self.keys_only {
                let wires: Vec<_> = question.options().into_iter().map(|(w, _)| w).collect();
                println!("{}: {}", question.key(), wires.join(", "));
                continue;
            }

            if i > 0 {
                println!();
            }
            println!("{}", format!("{}. {}", i + 1, question.title()).heading());
            println!("{}", question.prompt());
            println!("{}", format!("--{}", flag_name(question)).dim());
            for (wire, label) in question.options() {
                println!("  {wire:<38} {label}");
            }
        }
    }
}

/// The `survey submit` flag for `question`.
pub fn flag_name(question: Question) -> String {
    question.column().replace('_', "-")
}
