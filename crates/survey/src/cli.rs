use std::time::Duration;

mod fill;
mod list;
mod questions;
mod submit;
mod terminal;

use clap::ArgAction;
use survey_core::client::HttpSurveyApi;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the survey server
    #[arg(
        short,
        long,
        env = "SURVEY_SERVER",
        default_value = "http://localhost:5000",
        global = true
    )]
    server: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let connect = || HttpSurveyApi::new(&self.server, Duration::from_secs(self.timeout));

        match self.command.unwrap_or_default() {
            Command::Fill(command) => command.run(connect()?).await,
            Command::Submit(command) => command.run(connect()?).await,
            Command::List(command) => command.run(connect()?).await,
            Command::Questions(command) => {
                command.run();
                Ok(())
            }
        }
    }

    /// Logs go to stderr so they never mix with table or JSON output.
    ///
    /// `RUST_LOG`, when set, replaces the verbosity-derived filter.
    fn setup_logging(verbosity: u8) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_directives(verbosity)));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}

/// Dependencies stay at `warn`; `-v` only raises the survey crates.
fn log_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,survey={level},survey_core={level}")
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Fill in the survey interactively (default)
    Fill(fill::Command),

    /// Submit a survey with every answer given as a flag
    Submit(submit::Command),

    /// List stored surveys, newest first
    List(list::Command),

    /// Show every question and its accepted answers
    Questions(questions::Command),
}

impl Default for Command {
    fn default() -> Self {
        Self::Fill(fill::Command::default())
    }
}
