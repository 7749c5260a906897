//! # stookwijzer-client: WFS client for `Stookwijzer`
//!
//! Queries the RIVM `alo:stookwijzer_v2` layer over OGC WFS 2.0.0 and turns
//! the answer into [`RegionFeature`](stookwijzer_types::RegionFeature)s.
//!
//! Two lookups are offered:
//!
//! - [`FeatureClient::fetch_by_location`]: bounding-box query narrowed by a
//!   point-in-polygon test
//! - [`FeatureClient::fetch_by_postcode`]: exact `pc4` attribute filter
//!
//! Both take a [`CancellationToken`](tokio_util::sync::CancellationToken);
//! a cancelled lookup fails with [`FetchError::Cancelled`] and nothing else.

mod client;
mod error;
pub mod query;
pub mod wire;

pub use client::FeatureClient;
pub use error::{BODY_EXCERPT_CHARS, FetchError};
pub use query::ClientConfig;
