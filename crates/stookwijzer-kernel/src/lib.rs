//! # stookwijzer-kernel: Functional core of `Stookwijzer`
//!
//! The kernel decides what the user sees and which IO happens next. It
//! receives inputs (user triggers and completed operations) and produces a
//! new session plus effects to execute.
//!
//! ## Key Principles
//!
//! - **No IO**: The kernel never touches the network, disk or location services
//! - **No clocks**: Instants are stamped onto inputs by the runtime
//! - **Latest wins**: Only the most recently issued operation may change state
//! - **Pure functions**: `apply(session, input) -> (session, effects)`
//!
//! ## Architecture
//!
//! - [`timezone`]: Amsterdam wall-clock parsing
//! - [`geometry`]: Point-in-polygon matching
//! - [`segments`]: Forecast blocks, segments and current-segment resolution
//! - [`feature`]: Region features from raw properties
//! - [`view`]: The view-model a renderer paints
//! - [`input`] / [`effects`] / [`state`]: Coordinator vocabulary
//! - [`kernel`]: The `apply` function that ties it all together
//! - [`debounce`]: Postcode-input rate limiting
//! - [`traits`]: Clock, storage and renderer seams

pub mod debounce;
pub mod effects;
pub mod feature;
pub mod geometry;
pub mod input;
pub mod kernel;
pub mod segments;
pub mod state;
pub mod timezone;
pub mod traits;
pub mod view;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use debounce::Debouncer;
pub use effects::Effect;
pub use feature::region_feature;
pub use geometry::{point_in_polygon, point_in_ring};
pub use input::{Input, InputError, LocateOutcome, LookupOutcome};
pub use kernel::apply;
pub use segments::{CurrentAdvice, CurrentSegment, SegmentPosition, resolve_current};
pub use state::{Frame, Phase, Session, Severity, StatusMessage};
pub use timezone::parse_wall_clock;
pub use traits::{Clock, POSTCODE_KEY, Renderer, Storage, StorageError, THEME_KEY};
pub use view::{AdvisoryView, Headline, Tone};
