//! # stookwijzer-types: Core types for `Stookwijzer`
//!
//! This crate contains shared types used across the `Stookwijzer` system:
//! - Geography ([`GeoPoint`], [`Ring`], [`Polygon`], [`Geometry`])
//! - Region identifiers ([`Postcode4`])
//! - Forecast data ([`AdviceCode`], [`Finality`], [`AdvisoryBlock`], [`AdvisorySegment`])
//! - Resolved regions ([`RegionFeature`])
//! - Lookup sequencing ([`SequenceId`], [`LookupMode`], [`LookupQuery`], [`LookupRequest`])
//! - Preferences ([`Theme`])
//! - Location failures ([`GeolocationError`])

use std::fmt::{Debug, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An absolute point in time.
pub type Instant = DateTime<Utc>;

// ============================================================================
// Geography
// ============================================================================

/// A WGS84 position, longitude first (GeoJSON axis order).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Builds a point from a GeoJSON position (`[lon, lat, ...]`).
    ///
    /// Extra ordinates (elevation) are ignored. Returns `None` for positions
    /// with fewer than two ordinates or non-finite values.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some(Self::new(*lon, *lat)),
            _ => None,
        }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// An implicitly closed loop of vertices.
///
/// The last vertex may or may not repeat the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ring(Vec<GeoPoint>);

impl Ring {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<GeoPoint>> for Ring {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self(points)
    }
}

impl FromIterator<GeoPoint> for Ring {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A polygon: one outer boundary and zero or more holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    /// Builds a polygon from GeoJSON ring order: the first ring is the outer
    /// boundary, every following ring is a hole.
    ///
    /// Returns `None` when there is no outer ring.
    pub fn from_rings(rings: Vec<Ring>) -> Option<Self> {
        let mut rings = rings.into_iter();
        let outer = rings.next()?;
        Some(Self {
            outer,
            holes: rings.collect(),
        })
    }
}

/// Region geometry as published by the geodata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

// ============================================================================
// Postcode4 - validated 4-digit postal prefix
// ============================================================================

/// A 4-digit Dutch postal-code region (`PC4`).
///
/// Always exactly four ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode4(String);

impl Postcode4 {
    /// Parses an exact 4-digit code.
    pub fn parse(code: &str) -> Result<Self, InvalidPostcode> {
        if code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(InvalidPostcode(code.to_string()))
        }
    }

    /// Extracts the postal prefix from free-form user input.
    ///
    /// The input is trimmed, upper-cased and stripped of spaces; the result
    /// is its first four characters when those are all digits. Full
    /// six-character postcodes (`3811 AB`) therefore reduce to their prefix.
    pub fn normalize(input: &str) -> Option<Self> {
        let compact: String = input
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| *c != ' ')
            .collect();

        let prefix: String = compact.chars().take(4).collect();
        Self::parse(&prefix).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Postcode4 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Postcode4 {
    type Error = InvalidPostcode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Postcode4> for String {
    fn from(code: Postcode4) -> Self {
        code.0
    }
}

/// A string that is not a 4-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a 4-digit postcode: {0:?}")]
pub struct InvalidPostcode(pub String);

// ============================================================================
// Forecast data
// ============================================================================

/// Hour offsets of the four forecast blocks relative to the model runtime.
pub const BLOCK_OFFSETS: [u8; 4] = [0, 6, 12, 18];

/// Length of every forecast block in hours.
pub const BLOCK_HOURS: u8 = 6;

/// Wood-burning recommendation for a 6-hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdviceCode {
    /// No advisory available (`-1`).
    #[default]
    None,
    /// Yellow (`0`): burning may cause nuisance.
    Yellow,
    /// Orange (`1`): better not to burn.
    Orange,
    /// Red (`2`): do not burn.
    Red,
}

impl AdviceCode {
    /// Maps a wire code to an advice level. Unknown codes mean "no advisory".
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Yellow,
            1 => Self::Orange,
            2 => Self::Red,
            _ => Self::None,
        }
    }

    pub fn code(self) -> i8 {
        match self {
            Self::None => -1,
            Self::Yellow => 0,
            Self::Orange => 1,
            Self::Red => 2,
        }
    }
}

/// Whether a block's advice is settled or may still be revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Finality {
    Final,
    Provisional,
    /// The source did not publish a usable flag.
    #[default]
    Unknown,
}

impl Finality {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Final,
            Some(false) => Self::Provisional,
            None => Self::Unknown,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Final => Some(true),
            Self::Provisional => Some(false),
            Self::Unknown => None,
        }
    }

    pub fn is_final(self) -> bool {
        self == Self::Final
    }
}

/// One raw 6-hour forecast block, positioned by its offset from the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryBlock {
    pub offset_hours: u8,
    pub advice: AdviceCode,
    pub finality: Finality,
}

impl AdvisoryBlock {
    pub fn new(offset_hours: u8, advice: AdviceCode, finality: Finality) -> Self {
        Self {
            offset_hours,
            advice,
            finality,
        }
    }

    /// Hour offset at which this block ends.
    pub fn end_offset_hours(&self) -> u8 {
        self.offset_hours + BLOCK_HOURS
    }
}

/// A block anchored to absolute time: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorySegment {
    pub start: Instant,
    pub end: Instant,
    pub advice: AdviceCode,
    pub finality: Finality,
}

impl AdvisorySegment {
    /// Half-open containment: `start` is inside, `end` is not.
    pub fn contains(&self, at: Instant) -> bool {
        at >= self.start && at < self.end
    }
}

/// A region resolved from the geodata source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeature {
    pub postcode: Option<Postcode4>,
    /// Model runtime exactly as published.
    pub model_runtime_raw: Option<String>,
    /// Model runtime parsed as Amsterdam civil time, if it parsed.
    pub model_runtime: Option<Instant>,
    pub geometry: Option<Geometry>,
    pub blocks: [AdvisoryBlock; 4],
}

// ============================================================================
// Lookup sequencing
// ============================================================================

/// Issuance number of a lookup. Later lookups always compare greater.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SequenceId(u64);

impl SequenceId {
    pub const ZERO: SequenceId = SequenceId(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for SequenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for SequenceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Which kind of key produced a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupMode {
    ByLocation,
    ByPostcode,
}

/// What to ask the geodata source for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookupQuery {
    ByLocation(GeoPoint),
    ByPostcode(Postcode4),
}

impl LookupQuery {
    pub fn mode(&self) -> LookupMode {
        match self {
            Self::ByLocation(_) => LookupMode::ByLocation,
            Self::ByPostcode(_) => LookupMode::ByPostcode,
        }
    }
}

/// A lookup tagged with its issuance number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub sequence: SequenceId,
    pub query: LookupQuery,
}

impl LookupRequest {
    pub fn new(sequence: SequenceId, query: LookupQuery) -> Self {
        Self { sequence, query }
    }

    pub fn mode(&self) -> LookupMode {
        self.query.mode()
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Reads a stored theme name. Anything but `light` is dark.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Location failures
// ============================================================================

/// Why a one-shot location fix failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location request timed out")]
    Timeout,

    #[error("location is not supported on this device")]
    Unsupported,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}
