//! Error type definitions.
//!
//! This module defines the typed errors raised by each pipeline stage, plus the
//! error and info categories counted by `ProcessingStats`.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured feed endpoint is not a valid URL.
    #[error("Feed URL error: {0}")]
    FeedUrlError(#[from] url::ParseError),

    /// The configuration was rejected before any resource was built.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigValidationError),
}

/// Errors from coordinate construction and the flat-earth math.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// A direction or offset was requested where none is defined
    /// (zero-length vector, or a longitude correction at a pole).
    #[error("Degenerate input: {0}")]
    DegenerateInput(&'static str),

    /// Latitude outside [-90, 90], longitude outside [-180, 180], or non-finite.
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Rejected latitude
        latitude: f64,
        /// Rejected longitude
        longitude: f64,
    },

    /// A bounding box whose minimum is not below its maximum on some axis.
    #[error("Invalid bounding box: [{min_lon}, {min_lat}, {max_lon}, {max_lat}]")]
    InvalidBoundingBox {
        /// Western edge
        min_lon: f64,
        /// Southern edge
        min_lat: f64,
        /// Eastern edge
        max_lon: f64,
        /// Northern edge
        max_lat: f64,
    },
}

/// Why a position read did not produce a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFailure {
    /// The user or platform refused location access.
    PermissionDenied,
    /// The sensor did not answer in the platform's time limit.
    Timeout,
    /// Any other sensor or platform fault.
    SensorFault,
}

impl fmt::Display for PositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PositionFailure::PermissionDenied => "permission denied",
            PositionFailure::Timeout => "timeout",
            PositionFailure::SensorFault => "sensor fault",
        })
    }
}

/// Errors from a single-shot position read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    /// The sensor could not provide a position.
    #[error("Position unavailable: {reason}")]
    Unavailable {
        /// Failure reported by the sensor
        reason: PositionFailure,
    },
}

/// Errors from fetching and parsing the map-data feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Network failure before a response arrived.
    #[error("Feed unavailable: {0}")]
    Unavailable(#[from] ReqwestError),

    /// The service answered with a non-success status.
    #[error("Feed unavailable: HTTP {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// The body is not a well-formed feature document.
    #[error("Feed parse error: {0}")]
    Parse(String),
}

impl FeedError {
    /// True for network and status failures, false for parse failures.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, FeedError::Parse(_))
    }
}

/// Errors from a guide-placement request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GuideError {
    /// The current position could not be sampled.
    #[error(transparent)]
    Position(#[from] PositionError),

    /// The target coincides with the current position, or the offset is undefined.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// The renderer refused to place an entity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Placement rejected: {0}")]
pub struct PlacementError(pub String);

/// Errors from decoding a route-data message.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The payload is not valid route JSON.
    #[error("Route parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Categories of failures counted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Feed errors
    FeedConnectError,
    FeedTimeoutError,
    FeedStatusError,
    FeedBodyError,
    FeedOtherError,
    FeedParseError,
    // Position errors
    PositionPermissionDenied,
    PositionTimeout,
    PositionSensorFault,
    // Geometry errors
    DegenerateInput,
    InvalidCoordinate,
    // Placement errors
    PlacementError,
    // Route messages
    RouteParseError,
}

/// Notable non-failure events counted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    CameraUpdateDropped,
    PoiPlaced,
    CardinalMarkerPlaced,
    GuidePlaced,
    GuideRequestIgnored,
    GuideRemoved,
    RouteReceived,
    FeedNodeSkipped,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::FeedConnectError => "Feed connect error",
            ErrorType::FeedTimeoutError => "Feed timeout error",
            ErrorType::FeedStatusError => "Feed status error",
            ErrorType::FeedBodyError => "Feed body error",
            ErrorType::FeedOtherError => "Feed other error",
            ErrorType::FeedParseError => "Feed parse error",
            ErrorType::PositionPermissionDenied => "Position permission denied",
            ErrorType::PositionTimeout => "Position timeout",
            ErrorType::PositionSensorFault => "Position sensor fault",
            ErrorType::DegenerateInput => "Degenerate input",
            ErrorType::InvalidCoordinate => "Invalid coordinate",
            ErrorType::PlacementError => "Entity placement error",
            ErrorType::RouteParseError => "Route parse error",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::CameraUpdateDropped => "Camera update dropped",
            InfoType::PoiPlaced => "POI placed",
            InfoType::CardinalMarkerPlaced => "Cardinal marker placed",
            InfoType::GuidePlaced => "Guide placed",
            InfoType::GuideRequestIgnored => "Guide request ignored",
            InfoType::GuideRemoved => "Guide removed",
            InfoType::RouteReceived => "Route received",
            InfoType::FeedNodeSkipped => "Feed node skipped",
        }
    }
}
