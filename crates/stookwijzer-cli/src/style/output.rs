//! Line-oriented messages: marked status lines and labeled fields.

use stookwijzer::{Severity, StatusMessage};

use super::colors::SemanticStyle;

/// Prints a kernel status line, marked by its severity.
///
/// Errors go to stderr. Progress is left to the spinner and prints nothing.
pub fn print_status(status: StatusMessage) {
    match status.severity() {
        Severity::Progress => {}
        Severity::Notice => println!("{} {}", "⚠".warning(), status.text()),
        Severity::Error => print_error(status.text()),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {msg}", "✓".success());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {msg}", "✗".error());
}

/// Dimmed line for help text and side notes.
pub fn print_hint(msg: &str) {
    println!("{} {}", "→".muted(), msg.muted());
}

/// Indented `key: value` field.
pub fn print_labeled(key: &str, value: &str) {
    println!("  {}: {value}", key.muted());
}

pub fn print_section(title: &str) {
    println!("{}", title.header());
}

pub fn print_spacer() {
    println!();
}
