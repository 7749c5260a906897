//! Builds a [`RegionFeature`] from a feature's raw property bag.

use serde_json::{Map, Value};
use stookwijzer_types::{Geometry, Postcode4, RegionFeature};

use crate::segments::build_blocks;
use crate::timezone::parse_wall_clock;

/// Interprets the properties the geodata source attaches to a region.
///
/// Unusable values degrade instead of failing: an unparseable runtime keeps
/// its raw text but has no instant, and a malformed `pc4` is dropped.
pub fn region_feature(properties: &Map<String, Value>, geometry: Option<Geometry>) -> RegionFeature {
    let model_runtime_raw = match properties.get("model_runtime") {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let model_runtime = model_runtime_raw.as_deref().and_then(parse_wall_clock);

    RegionFeature {
        postcode: postcode(properties.get("pc4")),
        model_runtime_raw,
        model_runtime,
        geometry,
        blocks: build_blocks(properties),
    }
}

fn postcode(value: Option<&Value>) -> Option<Postcode4> {
    match value? {
        Value::String(text) => Postcode4::parse(text.trim()).ok(),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| Postcode4::parse(&format!("{n:04}")).ok()),
        _ => None,
    }
}
