//! Seams to the outside world.
//!
//! The kernel never calls these itself. The runtime uses them to stamp
//! inputs, persist preferences and paint frames.

use stookwijzer_types::Instant;

use crate::state::Frame;

/// Storage key for the last accepted postcode.
pub const POSTCODE_KEY: &str = "stookwijzer.pc4";

/// Storage key for the display theme.
pub const THEME_KEY: &str = "stookwijzer.theme";

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// String key-value persistence for preferences.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// A preference write that did not stick.
#[derive(Debug, thiserror::Error)]
#[error("failed to store {key}: {reason}")]
pub struct StorageError {
    pub key: String,
    pub reason: String,
}

/// Paints frames. Holds no decision logic.
pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}
