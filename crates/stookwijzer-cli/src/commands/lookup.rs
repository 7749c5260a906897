//! One-shot lookups: coordinates, postcode, location, demo and refresh.

use anyhow::{Result, bail};
use stookwijzer::{Postcode4, UiEvent};
use stookwijzer_config::StookwijzerConfig;

use crate::app;

/// Checks the advisory at a coordinate pair, as typed.
pub fn check(config: &StookwijzerConfig, latitude: &str, longitude: &str) -> Result<()> {
    app::run_once(
        config,
        vec![UiEvent::CheckCoordinates {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        }],
    )
}

/// Looks up a postcode. Anything after the four digits is ignored.
pub fn postcode(config: &StookwijzerConfig, text: &str) -> Result<()> {
    if Postcode4::normalize(text).is_none() {
        bail!("Not a Dutch postcode: {text:?} (expected four digits, e.g. 3511 or 3511 AB)");
    }
    app::run_once(
        config,
        vec![
            UiEvent::PostcodeEdited(text.to_string()),
            UiEvent::PostcodeSubmitted,
        ],
    )
}

pub fn locate(config: &StookwijzerConfig) -> Result<()> {
    app::run_once(config, vec![UiEvent::Locate])
}

pub fn demo(config: &StookwijzerConfig) -> Result<()> {
    app::run_once(config, vec![UiEvent::Demo])
}

/// The saved postcode if there is one, otherwise the current location.
pub fn refresh(config: &StookwijzerConfig) -> Result<()> {
    app::run_once(config, vec![UiEvent::Startup])
}
