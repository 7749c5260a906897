//! Busy spinner using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Glowing-ember spinner characters.
const EMBER_SPINNER: &[&str] = &["· ", "• ", "● ", "• "];

/// Creates a new spinner with a message.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(EMBER_SPINNER)
            .template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));

    pb
}

/// Finishes a spinner and clears it from the terminal.
pub fn finish_and_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
