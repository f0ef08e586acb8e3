//! Error categorization.
//!
//! Maps the typed pipeline errors onto the flat `ErrorType` counters.

use super::stats::ProcessingStats;
use super::types::{ErrorType, FeedError, GeoError, GuideError, PositionError, PositionFailure};

/// Categorizes a `reqwest::Error` raised while talking to the feed service.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.status().is_some() || error.is_status() {
        ErrorType::FeedStatusError
    } else if error.is_timeout() {
        ErrorType::FeedTimeoutError
    } else if error.is_connect() {
        ErrorType::FeedConnectError
    } else if error.is_body() || error.is_decode() {
        ErrorType::FeedBodyError
    } else {
        ErrorType::FeedOtherError
    }
}

/// Categorizes a feed failure.
pub fn categorize_feed_error(error: &FeedError) -> ErrorType {
    match error {
        FeedError::Unavailable(e) => categorize_reqwest_error(e),
        FeedError::Status { .. } => ErrorType::FeedStatusError,
        FeedError::Parse(_) => ErrorType::FeedParseError,
    }
}

/// Categorizes a position read failure.
pub fn categorize_position_error(error: &PositionError) -> ErrorType {
    match error {
        PositionError::Unavailable { reason } => match reason {
            PositionFailure::PermissionDenied => ErrorType::PositionPermissionDenied,
            PositionFailure::Timeout => ErrorType::PositionTimeout,
            PositionFailure::SensorFault => ErrorType::PositionSensorFault,
        },
    }
}

/// Categorizes a geometry failure.
pub fn categorize_geo_error(error: &GeoError) -> ErrorType {
    match error {
        GeoError::DegenerateInput(_) => ErrorType::DegenerateInput,
        GeoError::InvalidCoordinate { .. } | GeoError::InvalidBoundingBox { .. } => {
            ErrorType::InvalidCoordinate
        }
    }
}

/// Categorizes a guide-placement failure.
pub fn categorize_guide_error(error: &GuideError) -> ErrorType {
    match error {
        GuideError::Position(e) => categorize_position_error(e),
        GuideError::Geo(e) => categorize_geo_error(e),
    }
}

/// Increments the counter matching a feed failure.
pub fn update_error_stats(stats: &ProcessingStats, error: &FeedError) {
    stats.increment_error(categorize_feed_error(error));
}
