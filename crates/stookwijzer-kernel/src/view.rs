//! View-model for a resolved region.
//!
//! Everything a renderer shows is decided here: texts, tone and the
//! formatted time ranges. Renderers only paint.

use chrono::TimeDelta;
use stookwijzer_types::{AdviceCode, AdvisoryBlock, BLOCK_HOURS, Finality, Instant, RegionFeature};

use crate::segments::{CurrentAdvice, build_segments, current_advice};
use crate::timezone::ADVISORY_ZONE;

/// Shown where the region has no postcode.
pub const NO_POSTCODE: &str = "–";

/// Shown instead of the segment list when the forecast has no time anchor.
pub const EMPTY_FORECAST: &str = "Geen prognose beschikbaar.";

const DATE_TIME: &str = "%d-%m-%Y %H:%M";
const SHORT_DATE_TIME: &str = "%d-%m %H:%M";
const TIME: &str = "%H:%M";

// ============================================================================
// Advice presentation
// ============================================================================

/// Colour classification of the whole screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    Yellow,
    Orange,
    Red,
    #[default]
    Neutral,
}

impl Tone {
    pub fn for_advice(advice: AdviceCode) -> Self {
        match advice {
            AdviceCode::Yellow => Self::Yellow,
            AdviceCode::Orange => Self::Orange,
            AdviceCode::Red => Self::Red,
            AdviceCode::None => Self::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Neutral => "neutral",
        }
    }
}

/// Label and colour class for an advice level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceBadge {
    pub advice: AdviceCode,
    pub label: &'static str,
    pub class: &'static str,
}

impl AdviceBadge {
    pub fn new(advice: AdviceCode) -> Self {
        let (label, class) = match advice {
            AdviceCode::Yellow => ("Geel", "yellow"),
            AdviceCode::Orange => ("Oranje", "orange"),
            AdviceCode::Red => ("Rood", "red"),
            AdviceCode::None => ("Geen advies", "gray"),
        };
        Self {
            advice,
            label,
            class,
        }
    }
}

/// Large hero text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline {
    pub headline: &'static str,
    pub subline: &'static str,
}

impl Headline {
    pub fn for_advice(advice: AdviceCode) -> Self {
        let (headline, subline) = match advice {
            AdviceCode::Yellow => ("LET OP", "Stoken kan overlast geven"),
            AdviceCode::Orange => ("LET OP", "Beter niet stoken"),
            AdviceCode::Red => ("NIET", "Stook geen hout"),
            AdviceCode::None => ("ONBEKEND", "Geen advies beschikbaar"),
        };
        Self { headline, subline }
    }

    pub fn unknown() -> Self {
        Self::for_advice(AdviceCode::None)
    }
}

impl Default for Headline {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Segment label: settled or still open to revision.
pub fn finality_label(finality: Finality) -> &'static str {
    if finality.is_final() {
        "vastgesteld"
    } else {
        "kan nog wijzigen"
    }
}

/// Block-table cell for the raw finality flag.
pub fn finality_flag_text(finality: Finality) -> &'static str {
    match finality {
        Finality::Final => "Ja",
        Finality::Provisional => "Nee",
        Finality::Unknown => "–",
    }
}

// ============================================================================
// View-model
// ============================================================================

/// A segment's time range, for display and for screen readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRange {
    /// One or two lines (`\n`-separated).
    pub display: String,
    pub spoken: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    pub range: SlotRange,
    pub finality: Finality,
    pub finality_label: &'static str,
    pub badge: AdviceBadge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    pub period: String,
    pub badge: AdviceBadge,
    pub final_text: &'static str,
}

/// Everything shown for one resolved region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryView {
    pub postcode: String,
    /// `Model runtime: ...`, or empty when the source published none.
    pub runtime_text: String,
    pub current: CurrentAdvice,
    pub headline: Headline,
    pub tone: Tone,
    /// Empty when there is no time anchor; show [`EMPTY_FORECAST`] instead.
    pub segments: Vec<SegmentView>,
    pub blocks: Vec<BlockRow>,
}

/// Builds the view for `feature` as seen at `now`.
pub fn build_view(feature: &RegionFeature, now: Instant) -> AdvisoryView {
    let segments = build_segments(feature.model_runtime, &feature.blocks);
    let current = current_advice(&feature.blocks, &segments, now);

    let runtime_text = match (feature.model_runtime, &feature.model_runtime_raw) {
        (Some(runtime), _) => format!("Model runtime: {}", format_in_zone(runtime, DATE_TIME)),
        (None, Some(raw)) => format!("Model runtime: {raw}"),
        (None, None) => String::new(),
    };

    AdvisoryView {
        postcode: feature
            .postcode
            .as_ref()
            .map_or_else(|| NO_POSTCODE.to_string(), ToString::to_string),
        runtime_text,
        current,
        headline: Headline::for_advice(current.advice),
        tone: Tone::for_advice(current.advice),
        segments: segments
            .iter()
            .map(|segment| SegmentView {
                range: slot_range(segment.start, segment.end, now),
                finality: segment.finality,
                finality_label: finality_label(segment.finality),
                badge: AdviceBadge::new(segment.advice),
            })
            .collect(),
        blocks: feature
            .blocks
            .iter()
            .map(|block| block_row(block, feature.model_runtime))
            .collect(),
    }
}

fn block_row(block: &AdvisoryBlock, runtime: Option<Instant>) -> BlockRow {
    let period = match runtime {
        Some(runtime) => {
            let start = runtime + TimeDelta::hours(i64::from(block.offset_hours));
            let end = start + TimeDelta::hours(i64::from(BLOCK_HOURS));
            format!(
                "{} – {}",
                format_in_zone(start, DATE_TIME),
                format_in_zone(end, DATE_TIME)
            )
        }
        None => format!("{}–{} uur", block.offset_hours, block.end_offset_hours()),
    };

    BlockRow {
        period,
        badge: AdviceBadge::new(block.advice),
        final_text: finality_flag_text(block.finality),
    }
}

/// Formats `[start, end)` relative to the day of `today`.
///
/// Times on today's date are bare `hh:mm`; other days carry `dd-mm`. A range
/// that shows any date is split over two lines.
pub fn slot_range(start: Instant, end: Instant, today: Instant) -> SlotRange {
    let today = today.with_timezone(&ADVISORY_ZONE).date_naive();
    let start_day = start.with_timezone(&ADVISORY_ZONE).date_naive();
    let end_day = end.with_timezone(&ADVISORY_ZONE).date_naive();

    let show_start_date = start_day != today;
    let show_end_date = end_day != today;

    let start_text = if show_start_date {
        format_in_zone(start, SHORT_DATE_TIME)
    } else {
        format_in_zone(start, TIME)
    };

    if start_day == end_day && !show_start_date {
        let text = format!("{start_text}–{}", format_in_zone(end, TIME));
        return SlotRange {
            display: text.clone(),
            spoken: text,
        };
    }

    // Within one day the end time alone is unambiguous.
    let end_text = if show_end_date && start_day != end_day {
        format_in_zone(end, SHORT_DATE_TIME)
    } else {
        format_in_zone(end, TIME)
    };

    SlotRange {
        display: format!("{start_text}\n{end_text}"),
        spoken: format!("{start_text} tot {end_text}"),
    }
}

fn format_in_zone(instant: Instant, pattern: &str) -> String {
    instant.with_timezone(&ADVISORY_ZONE).format(pattern).to_string()
}
