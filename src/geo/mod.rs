//! Geographic value types and flat-earth math.
//!
//! Pure functions only: no I/O and no state.

mod coordinate;
mod math;

// Re-export public API
pub use coordinate::{BoundingBox, CoordinateDelta, Direction, GeoCoordinate};
pub use math::{distance, meters_to_degree_offset, unit_direction};
