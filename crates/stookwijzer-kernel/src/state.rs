//! Session state.
//!
//! One [`Session`] holds everything the coordinator knows: the sequence
//! counter, the in-flight operation, the accepted region and the [`Frame`]
//! currently on screen. State transitions take ownership and return a new
//! session (builder pattern).

use stookwijzer_types::{GeoPoint, LookupMode, Postcode4, RegionFeature, SequenceId, Theme};

use crate::view::{AdvisoryView, Headline, Tone};

// ============================================================================
// Status messages
// ============================================================================

/// How loudly a status should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Progress,
    Notice,
    Error,
}

/// User-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    Loading,
    Locating,
    LocationFound,
    DemoFilled,
    NoResultForLocation,
    NoResultForPostcode,
    FetchFailed,
    LocationUnavailable,
    MissingCoordinates,
}

impl StatusMessage {
    pub fn text(self) -> &'static str {
        match self {
            Self::Loading => "Bezig met ophalen…",
            Self::Locating => "Locatie opvragen…",
            Self::LocationFound => "Locatie gevonden. Stookadvies ophalen…",
            Self::DemoFilled => "Demo locatie ingevuld. Stookadvies ophalen…",
            Self::NoResultForLocation => {
                "Geen resultaat voor deze locatie (buiten NL of geen data)."
            }
            Self::NoResultForPostcode => "Geen resultaat voor deze postcode.",
            Self::FetchFailed => "Fout bij ophalen. Probeer opnieuw.",
            Self::LocationUnavailable => {
                "Locatie niet beschikbaar (toestemming geweigerd?). Vul handmatig in."
            }
            Self::MissingCoordinates => "Vul latitude en longitude in.",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Loading | Self::Locating | Self::LocationFound | Self::DemoFilled => {
                Severity::Progress
            }
            Self::NoResultForLocation | Self::NoResultForPostcode | Self::MissingCoordinates => {
                Severity::Notice
            }
            Self::FetchFailed | Self::LocationUnavailable => Severity::Error,
        }
    }

    pub fn no_result(mode: LookupMode) -> Self {
        match mode {
            LookupMode::ByLocation => Self::NoResultForLocation,
            LookupMode::ByPostcode => Self::NoResultForPostcode,
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

/// Everything currently on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Trigger controls are disabled while busy.
    pub busy: bool,
    pub status: Option<StatusMessage>,
    pub tone: Tone,
    pub headline: Headline,
    /// `None` hides the result panel.
    pub result: Option<AdvisoryView>,
    pub postcode_text: String,
    pub postcode_focused: bool,
    pub coordinates: Option<GeoPoint>,
    pub theme: Theme,
}

// ============================================================================
// Session
// ============================================================================

/// Lifecycle of the most recent trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting for a location fix.
    Locating { sequence: SequenceId },
    /// Waiting for the geodata source.
    Loading { sequence: SequenceId },
    Success,
    NoResult,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    latest: SequenceId,
    in_flight: Option<SequenceId>,
    phase: Phase,
    feature: Option<RegionFeature>,
    resolved_by: Option<LookupMode>,
    last_postcode: Option<Postcode4>,
    last_error: Option<String>,
    frame: Frame,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently issued sequence id.
    pub fn latest(&self) -> SequenceId {
        self.latest
    }

    /// The operation a new trigger would cancel.
    pub fn in_flight(&self) -> Option<SequenceId> {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The accepted region, replaced wholesale on every successful lookup.
    pub fn feature(&self) -> Option<&RegionFeature> {
        self.feature.as_ref()
    }

    pub fn resolved_by(&self) -> Option<LookupMode> {
        self.resolved_by
    }

    /// The last postcode accepted by a successful lookup or restored at startup.
    pub fn last_postcode(&self) -> Option<&Postcode4> {
        self.last_postcode.as_ref()
    }

    /// Detail of the last failure, for diagnostics.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_busy(&self) -> bool {
        self.frame.busy
    }

    pub(crate) fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// Issues the next sequence id, returning the one it supersedes if that
    /// operation is still in flight.
    pub(crate) fn with_next_sequence(mut self) -> (Self, SequenceId, Option<SequenceId>) {
        let sequence = self.latest.next();
        self.latest = sequence;
        let superseded = self.in_flight.replace(sequence);
        (self, sequence, superseded)
    }

    pub(crate) fn is_latest(&self, sequence: SequenceId) -> bool {
        sequence == self.latest
    }

    pub(crate) fn with_phase(mut self, phase: Phase) -> Self {
        if !matches!(phase, Phase::Locating { .. } | Phase::Loading { .. }) {
            self.in_flight = None;
        }
        self.phase = phase;
        self
    }

    pub(crate) fn with_feature(mut self, feature: RegionFeature, mode: LookupMode) -> Self {
        self.feature = Some(feature);
        self.resolved_by = Some(mode);
        self.last_error = None;
        self
    }

    pub(crate) fn without_feature(mut self) -> Self {
        self.feature = None;
        self.resolved_by = None;
        self
    }

    pub(crate) fn with_last_postcode(mut self, code: Option<Postcode4>) -> Self {
        self.last_postcode = code;
        self
    }

    pub(crate) fn with_error(mut self, error: String) -> Self {
        self.last_error = Some(error);
        self
    }
}
