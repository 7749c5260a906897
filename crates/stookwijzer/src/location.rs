//! One-shot location fixes.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use stookwijzer_types::{GeoPoint, GeolocationError};
use tokio::time::Instant;
use tracing::debug;

/// How a single fix is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be returned instead of a fresh one.
    pub maximum_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// Something that can report where the user is.
pub trait LocationProvider: Clone + 'static {
    fn locate(
        self,
        options: LocateOptions,
    ) -> impl Future<Output = Result<GeoPoint, GeolocationError>> + 'static;
}

/// Requests a fix, giving up after `options.timeout`.
pub async fn acquire<L: LocationProvider>(
    provider: L,
    options: LocateOptions,
) -> Result<GeoPoint, GeolocationError> {
    tokio::time::timeout(options.timeout, provider.locate(options))
        .await
        .unwrap_or(Err(GeolocationError::Timeout))
}

/// A provider with a configured answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticLocation {
    Fixed(GeoPoint),
    Unsupported,
}

impl LocationProvider for StaticLocation {
    async fn locate(self, _options: LocateOptions) -> Result<GeoPoint, GeolocationError> {
        match self {
            Self::Fixed(point) => Ok(point),
            Self::Unsupported => Err(GeolocationError::Unsupported),
        }
    }
}

/// Reuses a recent fix for up to `maximum_age`.
#[derive(Debug, Clone)]
pub struct CachedLocation<L> {
    inner: L,
    last: Rc<Cell<Option<(Instant, GeoPoint)>>>,
}

impl<L: LocationProvider> CachedLocation<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            last: Rc::new(Cell::new(None)),
        }
    }
}

impl<L: LocationProvider> LocationProvider for CachedLocation<L> {
    async fn locate(self, options: LocateOptions) -> Result<GeoPoint, GeolocationError> {
        if let Some((at, point)) = self.last.get()
            && at.elapsed() <= options.maximum_age
        {
            debug!(age_ms = at.elapsed().as_millis(), "reusing cached location");
            return Ok(point);
        }

        let point = self.inner.locate(options).await?;
        self.last.set(Some((Instant::now(), point)));
        Ok(point)
    }
}
