//! HTTP client for the advisory layer.

use reqwest::header::ACCEPT;
use serde_json::Value;
use stookwijzer_kernel::{point_in_polygon, region_feature};
use stookwijzer_types::{GeoPoint, Postcode4, RegionFeature};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::query::{self, ClientConfig, Params};
use crate::wire::{self, RawFeature};

/// Looks up advisory regions on the WFS service.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FeatureClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl FeatureClient {
    /// Builds a client with its own connection pool and the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Uses an existing HTTP client. Its timeout settings win.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Finds the region containing `point`.
    ///
    /// Fetches the candidates around the point and returns the first whose
    /// geometry actually contains it.
    #[instrument(skip(self, cancel), fields(lat = point.lat(), lon = point.lon()))]
    pub async fn fetch_by_location(
        &self,
        point: GeoPoint,
        cancel: &CancellationToken,
    ) -> Result<Option<RegionFeature>, FetchError> {
        let params = query::location_params(&self.config, point);
        let candidates = self.get_features(&params, cancel).await?;
        debug!(candidates = candidates.len(), "bbox query answered");

        Ok(candidates.into_iter().find_map(|candidate| {
            point_in_polygon(point, candidate.geometry.as_ref())
                .then(|| region_feature(&candidate.properties, candidate.geometry))
        }))
    }

    /// Finds the region with postcode `code`. The service's answer is
    /// authoritative; no geometric check is made.
    #[instrument(skip(self, cancel), fields(pc4 = %code))]
    pub async fn fetch_by_postcode(
        &self,
        code: &Postcode4,
        cancel: &CancellationToken,
    ) -> Result<Option<RegionFeature>, FetchError> {
        let params = query::postcode_params(&self.config, code);
        let first = self.get_features(&params, cancel).await?.into_iter().next();

        Ok(first.map(|feature| region_feature(&feature.properties, feature.geometry)))
    }

    async fn get_features(
        &self,
        params: &Params,
        cancel: &CancellationToken,
    ) -> Result<Vec<RawFeature>, FetchError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("request cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.request(params) => result,
        }
    }

    async fn request(&self, params: &Params) -> Result<Vec<RawFeature>, FetchError> {
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(params)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(%status, url = %response.url(), "WFS response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::network(status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        let collection: Value = serde_json::from_slice(&body)?;
        Ok(wire::features(collection))
    }
}
