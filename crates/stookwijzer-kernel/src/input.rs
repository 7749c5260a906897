//! Inputs to the coordinator.
//!
//! Every input is either a user trigger or the completion of an operation the
//! kernel asked for. Completions carry the sequence id they were issued under
//! and, where the kernel needs it, the instant the runtime observed them at.

use stookwijzer_types::{
    GeoPoint, GeolocationError, Instant, LookupRequest, Postcode4, RegionFeature, SequenceId, Theme,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Restores preferences and runs the first lookup.
    Startup {
        saved_postcode: Option<String>,
        saved_theme: Option<String>,
    },

    /// Manual check of the coordinate fields, as typed.
    CheckCoordinates { latitude: String, longitude: String },

    /// A postcode released by the debouncer or an explicit refresh.
    CheckPostcode(Postcode4),

    /// Ask the location provider for a fix.
    RequestLocation,

    /// Fill in the demo coordinates and check them.
    Demo(GeoPoint),

    /// Re-run the lookup that produced the current view.
    Refresh,

    ToggleTheme,
    SetTheme(Theme),

    /// The postcode field now reads `text`.
    PostcodeEdited(String),
    /// The postcode field lost focus.
    PostcodeBlurred,
    /// Escape was pressed in the postcode field.
    PostcodeEscaped { revert_to: Option<Postcode4> },

    LookupCompleted {
        request: LookupRequest,
        outcome: LookupOutcome,
        at: Instant,
    },

    LocationResolved {
        sequence: SequenceId,
        outcome: LocateOutcome,
    },
}

/// How a geodata lookup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Box<RegionFeature>),
    /// The source answered but no region matched.
    NoResult,
    /// Superseded before it finished.
    Cancelled,
    Failed(String),
}

/// How a location request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LocateOutcome {
    Fixed(GeoPoint),
    Failed(GeolocationError),
    Cancelled,
}

/// Coordinates that cannot start a lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("latitude is missing")]
    MissingLatitude,

    #[error("longitude is missing")]
    MissingLongitude,

    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// Parses the coordinate fields into a point.
pub fn parse_coordinates(latitude: &str, longitude: &str) -> Result<GeoPoint, InputError> {
    let lat = parse_field("latitude", latitude, InputError::MissingLatitude)?;
    let lon = parse_field("longitude", longitude, InputError::MissingLongitude)?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_field(field: &'static str, raw: &str, missing: InputError) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}
