//! Forecast segmentation.
//!
//! A region publishes four raw 6-hour blocks, each positioned by its offset
//! from the model runtime. Anchoring them to the parsed runtime yields four
//! contiguous `[start, end)` segments; [`resolve_current`] then picks the one
//! that applies at a given instant, falling back to the nearest segment when
//! the instant lies outside the forecast.

use chrono::TimeDelta;
use serde_json::{Map, Value};
use stookwijzer_types::{
    AdviceCode, AdvisoryBlock, AdvisorySegment, BLOCK_HOURS, BLOCK_OFFSETS, Finality, Instant,
};

/// Reads the four blocks from a feature's raw properties.
///
/// Advice comes from `advies_{offset}` and finality from `definitief_{offset}`.
/// Anything that is not an integer 0, 1 or 2 means "no advisory"; anything
/// that is not a boolean means "finality unknown".
pub fn build_blocks(properties: &Map<String, Value>) -> [AdvisoryBlock; 4] {
    BLOCK_OFFSETS.map(|offset| {
        let advice = advice_value(properties.get(&format!("advies_{offset}")));
        let finality = Finality::from_flag(
            properties
                .get(&format!("definitief_{offset}"))
                .and_then(Value::as_bool),
        );
        AdvisoryBlock::new(offset, advice, finality)
    })
}

fn advice_value(value: Option<&Value>) -> AdviceCode {
    match value.and_then(Value::as_f64) {
        Some(n) if n.fract() == 0.0 => AdviceCode::from_code(n as i64),
        _ => AdviceCode::None,
    }
}

/// Anchors blocks to the model runtime. No runtime, no segments.
pub fn build_segments(runtime: Option<Instant>, blocks: &[AdvisoryBlock]) -> Vec<AdvisorySegment> {
    let Some(runtime) = runtime else {
        return Vec::new();
    };

    blocks
        .iter()
        .map(|block| {
            let start = runtime + TimeDelta::hours(i64::from(block.offset_hours));
            AdvisorySegment {
                start,
                end: start + TimeDelta::hours(i64::from(BLOCK_HOURS)),
                advice: block.advice,
                finality: block.finality,
            }
        })
        .collect()
}

/// How the resolved segment relates to the instant it was resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    /// The instant lies inside the segment.
    Current,
    /// The instant precedes the whole forecast; this is its first segment.
    Upcoming,
    /// The forecast has run out; this is its last segment.
    Stale,
}

/// The segment that applies at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSegment {
    pub index: usize,
    pub segment: AdvisorySegment,
    pub position: SegmentPosition,
}

/// Picks the segment for `now`.
///
/// Boundaries belong to the later segment. Before the forecast the first
/// segment applies, after it the last one does. An instant in a gap between
/// segments falls back to the latest segment that started before it, marked
/// stale. Empty input resolves to `None`.
pub fn resolve_current(segments: &[AdvisorySegment], now: Instant) -> Option<CurrentSegment> {
    let first = segments.first()?;

    let (index, position) = if let Some(index) = segments.iter().position(|s| s.contains(now)) {
        (index, SegmentPosition::Current)
    } else if now < first.start {
        (0, SegmentPosition::Upcoming)
    } else {
        let index = segments
            .iter()
            .rposition(|s| s.start <= now)
            .unwrap_or(segments.len() - 1);
        (index, SegmentPosition::Stale)
    };

    Some(CurrentSegment {
        index,
        segment: segments[index],
        position,
    })
}

/// The advice to headline, with or without time context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAdvice {
    pub advice: AdviceCode,
    pub finality: Finality,
    /// `None` when there is no runtime to anchor the forecast.
    pub resolved: Option<CurrentSegment>,
}

/// Resolves the headline advice, degrading to the first raw block when the
/// forecast has no time anchor.
pub fn current_advice(
    blocks: &[AdvisoryBlock],
    segments: &[AdvisorySegment],
    now: Instant,
) -> CurrentAdvice {
    if let Some(resolved) = resolve_current(segments, now) {
        return CurrentAdvice {
            advice: resolved.segment.advice,
            finality: resolved.segment.finality,
            resolved: Some(resolved),
        };
    }

    let first = blocks.first();
    CurrentAdvice {
        advice: first.map_or(AdviceCode::None, |b| b.advice),
        finality: first.map_or(Finality::Unknown, |b| b.finality),
        resolved: None,
    }
}
