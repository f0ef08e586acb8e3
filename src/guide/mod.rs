//! Guide entity positioning.
//!
//! This module provides:
//! - `GuidePositioner`: samples the current position and offsets it a fixed
//!   metric distance toward a target
//! - `GuideSlot`: the at-most-one guide entity currently in the scene
//! - Cardinal marker positions around a center point

mod markers;
mod positioner;
mod slot;

// Re-export public API
pub use markers::{cardinal_marker_positions, CARDINAL_POINTS};
pub use positioner::{guide_offset_from, GuideOffset, GuidePositioner};
pub use slot::{GuideSlot, SlotPlacement};
