//! Semantic color palette for terminal output.

use owo_colors::{OwoColorize, Style};
use stookwijzer_kernel::Tone;

pub fn success_style() -> Style {
    Style::new().green().bold()
}

pub fn error_style() -> Style {
    Style::new().red().bold()
}

pub fn warning_style() -> Style {
    Style::new().yellow()
}

pub fn muted_style() -> Style {
    Style::new().dimmed()
}

pub fn header_style() -> Style {
    Style::new().bold()
}

/// The advisory palette: yellow, orange, red, and dimmed when unknown.
pub fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Yellow => Style::new().yellow().bold(),
        Tone::Orange => Style::new().truecolor(255, 140, 0).bold(),
        Tone::Red => Style::new().red().bold(),
        Tone::Neutral => Style::new().dimmed().bold(),
    }
}

/// Trait extension to apply semantic styles.
pub trait SemanticStyle: Sized {
    fn success(&self) -> String;
    fn error(&self) -> String;
    fn warning(&self) -> String;
    fn muted(&self) -> String;
    fn header(&self) -> String;
    /// Colors text by advisory tone.
    fn toned(&self, tone: Tone) -> String;
}

impl<T: std::fmt::Display> SemanticStyle for T {
    fn success(&self) -> String {
        styled(self, success_style())
    }

    fn error(&self) -> String {
        styled(self, error_style())
    }

    fn warning(&self) -> String {
        styled(self, warning_style())
    }

    fn muted(&self) -> String {
        styled(self, muted_style())
    }

    fn header(&self) -> String {
        styled(self, header_style())
    }

    fn toned(&self, tone: Tone) -> String {
        styled(self, tone_style(tone))
    }
}

fn styled(value: &impl std::fmt::Display, style: Style) -> String {
    if super::no_color() {
        value.to_string()
    } else {
        value.style(style).to_string()
    }
}
