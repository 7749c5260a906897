//! Rate limiting for postcode-driven lookups.
//!
//! The debouncer owns a single deadline measured on a virtual clock (a
//! `Duration` since an arbitrary epoch chosen by the caller). Each edit
//! supersedes the pending deadline; the immediate paths (blur, Enter,
//! submit) and Escape cancel it outright.

use std::time::Duration;

use stookwijzer_types::Postcode4;

/// Default quiet period before an edited postcode is looked up.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    code: Postcode4,
    deadline: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// When the pending lookup fires, if one is armed.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Records an edit at `now`.
    ///
    /// Any pending deadline is dropped. A new one is armed only when the text
    /// holds a postcode that differs from the accepted one. Returns whether a
    /// deadline is now armed.
    pub fn edit(&mut self, text: &str, accepted: Option<&Postcode4>, now: Duration) -> bool {
        self.pending = lookup_candidate(text, accepted).map(|code| Pending {
            code,
            deadline: now + self.delay,
        });
        self.pending.is_some()
    }

    /// Releases the pending postcode once its deadline has passed.
    ///
    /// The accepted code is checked again at release time: a lookup that
    /// completed in the meantime may have accepted the same postcode.
    pub fn fire(&mut self, now: Duration, accepted: Option<&Postcode4>) -> Option<Postcode4> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        let pending = self.pending.take()?;
        (Some(&pending.code) != accepted).then_some(pending.code)
    }

    /// Immediate path (blur, Enter, submit): cancels the deadline and
    /// evaluates `text` right away.
    pub fn flush(&mut self, text: &str, accepted: Option<&Postcode4>) -> Option<Postcode4> {
        self.pending = None;
        lookup_candidate(text, accepted)
    }

    /// Escape: cancels the deadline and returns the text to revert to.
    pub fn escape(&mut self, accepted: Option<&Postcode4>) -> Option<Postcode4> {
        self.pending = None;
        accepted.cloned()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

fn lookup_candidate(text: &str, accepted: Option<&Postcode4>) -> Option<Postcode4> {
    Postcode4::normalize(text).filter(|code| Some(code) != accepted)
}
