//! Terminal renderer.
//!
//! Paints kernel frames as they change: a spinner while busy, a status line
//! when the status changes, and the advisory panel when a new result lands.

use indicatif::ProgressBar;
use stookwijzer::{Frame, Renderer, StatusMessage};
use stookwijzer_kernel::view::{AdviceBadge, AdvisoryView, EMPTY_FORECAST, finality_label};

use crate::style::colors::SemanticStyle;
use crate::style::{
    blocks_table, create_spinner, finish_and_clear, print_hint, print_labeled, print_spacer,
    print_status, segments_table,
};

#[derive(Default)]
pub struct TerminalRenderer {
    last: Frame,
    spinner: Option<ProgressBar>,
    rendered_any: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync_spinner(&mut self, frame: &Frame) {
        let message = frame
            .status
            .map_or(StatusMessage::Loading.text(), StatusMessage::text);
        match (frame.busy, self.spinner.take()) {
            (true, Some(pb)) => {
                pb.set_message(message);
                self.spinner = Some(pb);
            }
            (true, None) => self.spinner = Some(create_spinner(message)),
            (false, Some(pb)) => finish_and_clear(&pb),
            (false, None) => {}
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame) {
        self.sync_spinner(frame);

        if frame.status != self.last.status
            && let Some(status) = frame.status
        {
            print_status(status);
        }

        if frame.result != self.last.result
            && let Some(view) = &frame.result
        {
            print_advisory(view);
        }

        if self.rendered_any && frame.theme != self.last.theme {
            print_hint(&format!("Thema: {}", frame.theme));
        }

        self.last = frame.clone();
        self.rendered_any = true;
    }
}

/// Prints the advisory panel for one region.
pub fn print_advisory(view: &AdvisoryView) {
    print_spacer();
    println!(
        "{}",
        format!("{}  {}", view.headline.headline, view.headline.subline).toned(view.tone)
    );
    print_labeled("Postcode", &view.postcode);

    let badge = AdviceBadge::new(view.current.advice);
    print_labeled(
        "Nu",
        &format!("{} ({})", badge.label, finality_label(view.current.finality)),
    );
    if !view.runtime_text.is_empty() {
        println!("  {}", view.runtime_text.muted());
    }

    print_spacer();
    if view.segments.is_empty() {
        println!("{}", EMPTY_FORECAST.muted());
    } else {
        let current = view.current.resolved.as_ref().map(|c| c.index);
        println!("{}", segments_table(&view.segments, current));
    }
    println!("{}", blocks_table(&view.blocks));
}
