//! GeoJSON feature-collection decoding.
//!
//! Decoding is tolerant: a body without a `features` array is an empty
//! collection, a feature without properties has an empty property bag, and
//! geometry that is missing or not a (multi)polygon is treated as absent.

use serde::Deserialize;
use serde_json::{Map, Value};
use stookwijzer_types::{GeoPoint, Geometry, Polygon, Ring};

/// One feature as published, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub properties: Map<String, Value>,
    pub geometry: Option<Geometry>,
}

/// Extracts the features of a GeoJSON `FeatureCollection`.
pub fn features(collection: Value) -> Vec<RawFeature> {
    let Value::Object(mut collection) = collection else {
        return Vec::new();
    };
    let Some(Value::Array(features)) = collection.remove("features") else {
        return Vec::new();
    };
    features.into_iter().map(raw_feature).collect()
}

fn raw_feature(feature: Value) -> RawFeature {
    let Value::Object(mut feature) = feature else {
        return RawFeature {
            properties: Map::new(),
            geometry: None,
        };
    };

    let properties = match feature.remove("properties") {
        Some(Value::Object(properties)) => properties,
        _ => Map::new(),
    };
    let geometry = feature.remove("geometry").and_then(geometry);

    RawFeature {
        properties,
        geometry,
    }
}

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WireGeometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

/// Converts a GeoJSON geometry object. Anything but a well-formed
/// `Polygon` or `MultiPolygon` yields `None`.
pub fn geometry(value: Value) -> Option<Geometry> {
    match serde_json::from_value(value).ok()? {
        WireGeometry::Polygon { coordinates } => polygon(coordinates).map(Geometry::Polygon),
        WireGeometry::MultiPolygon { coordinates } => Some(Geometry::MultiPolygon(
            coordinates.into_iter().filter_map(polygon).collect(),
        )),
    }
}

fn polygon(rings: Vec<Vec<Position>>) -> Option<Polygon> {
    Polygon::from_rings(rings.into_iter().map(ring).collect())
}

fn ring(positions: Vec<Position>) -> Ring {
    positions
        .iter()
        .filter_map(|p| GeoPoint::from_position(p))
        .collect()
}
