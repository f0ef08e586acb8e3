//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for each pipeline stage (geometry, position, feed, guide, route)
//! - Categorization of those errors into flat counters
//! - Processing statistics tracking (errors and info events)
//!
//! No failure is retried: each one aborts the step that raised it, is logged,
//! and is counted here.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_feed_error, categorize_geo_error, categorize_guide_error,
    categorize_position_error, categorize_reqwest_error, update_error_stats,
};
pub use stats::ProcessingStats;
pub use types::{
    ErrorType, FeedError, GeoError, GuideError, InfoType, InitializationError, PlacementError,
    PositionError, PositionFailure, RouteError,
};
