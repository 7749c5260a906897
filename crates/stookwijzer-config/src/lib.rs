//! Configuration management for Stookwijzer
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (STOOKWIJZER_* prefix, highest precedence)
//! 2. stookwijzer.local.toml (gitignored, local overrides)
//! 3. stookwijzer.toml (working-directory config)
//! 4. ~/.config/stookwijzer/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Preferences the user changes at runtime (last postcode, theme) live in a
//! separate file, see [`FilePreferences`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stookwijzer_client::ClientConfig;
use stookwijzer_types::GeoPoint;

mod error;
mod loader;
mod paths;
mod preferences;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;
pub use preferences::{FilePreferences, PreferenceError};

/// Main Stookwijzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StookwijzerConfig {
    pub service: ServiceConfig,
    pub lookup: LookupConfig,
    pub location: LocationConfig,
    pub demo: DemoConfig,
    pub storage: StorageConfig,
}

/// The WFS service holding the advisory layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: String,
    pub type_name: String,
    pub srs_name: String,
    /// Half the side of the search box around a point, in degrees.
    pub bbox_half_width: f64,
    pub location_count: u32,
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            endpoint: client.endpoint,
            type_name: client.type_name,
            srs_name: client.srs_name,
            bbox_half_width: client.bbox_half_width,
            location_count: client.location_count,
            request_timeout_secs: client.timeout.as_secs(),
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Quiet period after a postcode edit before it is looked up.
    pub debounce_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self { debounce_ms: 350 }
    }
}

impl LookupConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// One-shot location requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub timeout_secs: u64,
    /// How old a cached fix may be and still be used.
    pub maximum_age_secs: u64,
    pub high_accuracy: bool,
    /// Fixed position reported by the location provider, if any.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            maximum_age_secs: 60,
            high_accuracy: false,
            latitude: None,
            longitude: None,
        }
    }
}

impl LocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_secs(self.maximum_age_secs)
    }

    /// The configured fixed position; `None` unless both ordinates are set.
    pub fn fixed_point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.longitude?, self.latitude?))
    }
}

/// Coordinates filled in by the demo trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        // Utrecht
        Self {
            latitude: 52.0907,
            longitude: 5.1214,
        }
    }
}

impl DemoConfig {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the preferences file location.
    pub preferences_file: Option<PathBuf>,
}

impl StookwijzerConfig {
    /// Rejects values no lookup could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let service = &self.service;
        if !(service.bbox_half_width.is_finite() && service.bbox_half_width > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "service.bbox_half_width must be a positive number, got {}",
                service.bbox_half_width
            )));
        }
        if service.location_count == 0 {
            return Err(ConfigError::ValidationError(
                "service.location_count must be at least 1".to_string(),
            ));
        }
        if service.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service.endpoint must not be empty".to_string(),
            ));
        }
        if self.location.latitude.is_some() != self.location.longitude.is_some() {
            return Err(ConfigError::ValidationError(
                "location.latitude and location.longitude must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Where runtime preferences are stored.
    pub fn preferences_path(&self, paths: &Paths) -> Result<PathBuf, ConfigError> {
        match &self.storage.preferences_file {
            Some(path) => Ok(path.clone()),
            None => paths.preferences_file(),
        }
    }

    /// Resolve a relative preferences path against `base_dir`
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        if let Some(path) = &self.storage.preferences_file
            && path.is_relative()
        {
            self.storage.preferences_file = Some(base_dir.as_ref().join(path));
        }
    }
}
