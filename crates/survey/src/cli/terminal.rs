//! Coloured output and progress feedback

use std::{sync::OnceLock, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};

/// How a line of output should stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Heading,
    Dim,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Heading => Style::new().bright_blue().bold(),
            Self::Dim => Style::new().dimmed(),
        }
    }
}

/// Detected once; stdout does not change mid-run.
fn stdout_has_colour() -> bool {
    static COLOUR: OnceLock<bool> = OnceLock::new();
    *COLOUR.get_or_init(|| supports_color::on(supports_color::Stream::Stdout).is_some())
}

fn paint(text: &str, tone: Tone, colour: bool) -> String {
    if colour {
        text.style(tone.style()).to_string()
    } else {
        text.to_string()
    }
}

/// Styles any text for the terminal, plain when stdout has no colour.
pub trait Colorize {
    fn tone(&self, tone: Tone) -> String;

    fn success(&self) -> String {
        self.tone(Tone::Success)
    }

    fn warning(&self) -> String {
        self.tone(Tone::Warning)
    }

    fn heading(&self) -> String {
        self.tone(Tone::Heading)
    }

    fn dim(&self) -> String {
        self.tone(Tone::Dim)
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn tone(&self, tone: Tone) -> String {
        paint(self.as_ref(), tone, stdout_has_colour())
    }
}

/// A ticking spinner on stderr; clear it with `finish_and_clear`.
pub fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
