//! # Stookwijzer
//!
//! Wood-burning advisories for Dutch four-digit postcode areas. A lookup by
//! location or postcode fetches the matching region from the geodata
//! service and turns its four six-hour forecast blocks into a view of what
//! holds right now and what comes next.
//!
//! ## Crate Structure
//!
//! - [`stookwijzer_types`]: Domain vocabulary (postcodes, geometry, advice)
//! - [`stookwijzer_kernel`]: Pure coordinator and view-model logic
//! - [`stookwijzer_client`]: WFS client for the geodata service
//! - [`runtime`]: Executes kernel effects on a single-threaded async loop
//! - [`source`] / [`location`]: Seams for geodata and location providers
//!
//! ## Quick Start
//!
//! ```ignore
//! use stookwijzer::{FeatureClient, ClientConfig, Runtime, RuntimeSettings, UiEvent};
//! use stookwijzer::location::StaticLocation;
//! use stookwijzer::runtime::{MemoryStorage, SystemClock};
//!
//! let client = FeatureClient::new(ClientConfig::default())?;
//! let mut runtime = Runtime::new(
//!     client,
//!     StaticLocation::Unsupported,
//!     MemoryStorage::new(),
//!     renderer,
//!     SystemClock,
//!     RuntimeSettings::default(),
//! );
//! runtime.dispatch(UiEvent::PostcodeEdited("3511".to_string()));
//! runtime.dispatch(UiEvent::PostcodeSubmitted);
//! runtime.settle().await;
//! ```

pub mod location;
pub mod runtime;
pub mod source;

#[cfg(test)]
mod tests;

pub use location::{CachedLocation, LocateOptions, LocationProvider, StaticLocation, acquire};
pub use runtime::{MemoryStorage, Runtime, RuntimeSettings, SystemClock, UiEvent};
pub use source::{FeatureSource, FetchResult, lookup_outcome};

// Re-export the layers underneath
pub use stookwijzer_client::{ClientConfig, FeatureClient, FetchError};
pub use stookwijzer_kernel::{
    AdvisoryView, Clock, Frame, Headline, Phase, Renderer, Session, Severity, StatusMessage,
    Storage, StorageError, Tone,
};
pub use stookwijzer_types::{
    AdviceCode, Finality, GeoPoint, GeolocationError, LookupMode, Postcode4, RegionFeature, Theme,
};
