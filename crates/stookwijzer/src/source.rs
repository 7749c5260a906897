//! Where region features come from.

use std::future::Future;

use stookwijzer_client::{FeatureClient, FetchError};
use stookwijzer_kernel::LookupOutcome;
use stookwijzer_types::{GeoPoint, Postcode4, RegionFeature};
use tokio_util::sync::CancellationToken;

pub type FetchResult = Result<Option<RegionFeature>, FetchError>;

/// A geodata source the runtime can query.
///
/// Methods consume a handle (sources are cheap to clone) so the returned
/// futures own everything they need and can outlive the call site.
pub trait FeatureSource: Clone + 'static {
    fn fetch_by_location(
        self,
        point: GeoPoint,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static;

    fn fetch_by_postcode(
        self,
        code: Postcode4,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static;
}

impl FeatureSource for FeatureClient {
    fn fetch_by_location(
        self,
        point: GeoPoint,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static {
        async move { FeatureClient::fetch_by_location(&self, point, &cancel).await }
    }

    fn fetch_by_postcode(
        self,
        code: Postcode4,
        cancel: CancellationToken,
    ) -> impl Future<Output = FetchResult> + 'static {
        async move { FeatureClient::fetch_by_postcode(&self, &code, &cancel).await }
    }
}

/// Classifies a fetch result for the kernel.
pub fn lookup_outcome(result: FetchResult) -> LookupOutcome {
    match result {
        Ok(Some(feature)) => LookupOutcome::Found(Box::new(feature)),
        Ok(None) => LookupOutcome::NoResult,
        Err(err) if err.is_cancelled() => LookupOutcome::Cancelled,
        Err(err) => LookupOutcome::Failed(err.to_string()),
    }
}
