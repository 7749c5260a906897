//! WFS `GetFeature` query parameters.

use std::time::Duration;

use stookwijzer_types::{GeoPoint, Postcode4};

pub const DEFAULT_ENDPOINT: &str = "https://data.rivm.nl/geo/alo/ows";
pub const DEFAULT_TYPE_NAME: &str = "alo:stookwijzer_v2";
pub const DEFAULT_SRS_NAME: &str = "CRS:84";
pub const DEFAULT_BBOX_HALF_WIDTH: f64 = 0.02;
pub const DEFAULT_LOCATION_COUNT: u32 = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Where and how to query the advisory layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub type_name: String,
    pub srs_name: String,
    /// Half the side of the search box around a point, in degrees.
    pub bbox_half_width: f64,
    /// Candidate cap for bounding-box queries.
    pub location_count: u32,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            type_name: DEFAULT_TYPE_NAME.to_string(),
            srs_name: DEFAULT_SRS_NAME.to_string(),
            bbox_half_width: DEFAULT_BBOX_HALF_WIDTH,
            location_count: DEFAULT_LOCATION_COUNT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub type Params = Vec<(&'static str, String)>;

/// Candidates whose geometry intersects a small box around `point`.
pub fn location_params(config: &ClientConfig, point: GeoPoint) -> Params {
    let d = config.bbox_half_width;
    let bbox = format!(
        "{},{},{},{},{}",
        point.lon() - d,
        point.lat() - d,
        point.lon() + d,
        point.lat() + d,
        config.srs_name
    );

    let mut params = base_params(config, config.location_count);
    params.push(("bbox", bbox));
    params
}

/// The single region with this postcode.
pub fn postcode_params(config: &ClientConfig, code: &Postcode4) -> Params {
    let mut params = base_params(config, 1);
    params.push(("cql_filter", format!("pc4='{code}'")));
    params
}

fn base_params(config: &ClientConfig, count: u32) -> Params {
    vec![
        ("service", "WFS".to_string()),
        ("version", "2.0.0".to_string()),
        ("request", "GetFeature".to_string()),
        ("typeNames", config.type_name.clone()),
        ("outputFormat", "application/json".to_string()),
        ("srsName", config.srs_name.clone()),
        ("count", count.to_string()),
    ]
}
