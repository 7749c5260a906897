//! File-backed preference storage.
//!
//! Preferences are a flat TOML table of string keys to string values. Every
//! write replaces the whole file through a temporary sibling and a rename,
//! so a crash never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use stookwijzer_kernel::{Storage, StorageError};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to read preferences at {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse preferences at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to write preferences at {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Preferences persisted in a TOML file.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Opens the preferences at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|source| PreferenceError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(source) if source.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PreferenceError::Read { path, source }),
        };
        Ok(Self { path, values })
    }

    /// Opens the preferences at `path`, starting empty if the file is
    /// unreadable or corrupt.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::open(path.clone()).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable preferences");
            Self {
                path,
                values: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Stores `value` under `key` and writes the file.
    pub fn store(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let encoded = toml::to_string(&self.values)?;
        let write_error = |source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, encoded).map_err(write_error)?;
        fs::rename(&staging, &self.path).map_err(write_error)?;

        debug!(path = %self.path.display(), "preferences written");
        Ok(())
    }
}

impl Storage for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store(key, value).map_err(|err| StorageError {
            key: key.to_string(),
            reason: err.to_string(),
        })
    }
}
