//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including feed defaults, guide timings, and overlay timings.

/// Default map-data endpoint (OpenStreetMap API 0.6 `map` call).
pub const DEFAULT_FEED_URL: &str = "https://api.openstreetmap.org/api/0.6/map";

/// Half-width of the feed query window, in degrees.
///
/// 0.01 degrees is roughly 1.1 km at the equator and shrinks in longitude
/// toward the poles. This is a configured radius, not a geodesic one.
pub const DEFAULT_BBOX_EPSILON: f64 = 0.01;

/// Largest accepted query half-width, in degrees.
pub const MAX_BBOX_EPSILON: f64 = 1.0;

/// Meters per degree of latitude used by the flat-earth offset conversion.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Default distance between the user and the guide entity, in meters.
pub const DEFAULT_GUIDE_DISPLACEMENT_M: f64 = 2.0;

/// How long a guide entity stays in the scene before it is removed.
pub const DEFAULT_GUIDE_LIFETIME_MS: u64 = 10_000;

/// Delay after a POI click before the name overlay is cleared.
pub const DEFAULT_OVERLAY_NAME_CLEAR_MS: u64 = 3_000;

/// Delay after a POI click before the information overlay is shown.
/// One millisecond after the name clear so the information text wins.
pub const DEFAULT_OVERLAY_INFO_DELAY_MS: u64 = 3_001;

/// Delay after a POI click before the information overlay is cleared.
pub const DEFAULT_OVERLAY_INFO_CLEAR_MS: u64 = 8_000;

/// Distance of cardinal markers from the camera position, in meters.
pub const DEFAULT_CARDINAL_MARKER_DISTANCE_M: f64 = 10.0;

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// User-Agent sent to the feed service.
///
/// The OpenStreetMap API usage policy asks clients to identify themselves.
pub const DEFAULT_USER_AGENT: &str = concat!("poi_guide/", env!("CARGO_PKG_VERSION"));

/// Tag key that marks a feature node as a point of interest.
pub const NAME_TAG: &str = "name";

/// Tag key carrying the text shown after the name overlay.
pub const INFORMATION_TAG: &str = "information";
