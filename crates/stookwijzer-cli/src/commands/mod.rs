//! CLI command implementations.

pub mod config;
pub mod lookup;
pub mod theme;
pub mod version;
pub mod watch;
