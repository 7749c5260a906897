//! Effects produced by the kernel.
//!
//! The kernel is pure: it describes the IO it needs and the runtime performs
//! it. Screen changes are not effects of their own; the kernel updates the
//! session's [`Frame`](crate::state::Frame) and asks for it to be rendered.

use stookwijzer_types::{LookupRequest, Postcode4, SequenceId, Theme};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Signal cancellation to the operation issued under this id.
    Cancel(SequenceId),

    /// Query the geodata source.
    Fetch(LookupRequest),

    /// Ask the location provider for a one-shot fix.
    AcquireLocation { sequence: SequenceId },

    /// Store the last accepted postcode.
    PersistPostcode(Postcode4),

    /// Store the display theme.
    PersistTheme(Theme),

    /// Paint the session's current frame.
    Render,
}
