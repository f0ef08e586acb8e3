//! Coordinate value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error_handling::GeoError;

/// A validated latitude/longitude pair in degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; both are
/// finite. Values are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

impl GeoCoordinate {
    /// Builds a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(GeoError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Applies a degree delta.
    ///
    /// Longitude wraps across the antimeridian; a latitude pushed past a pole
    /// is an error.
    pub fn offset(&self, delta: CoordinateDelta) -> Result<Self, GeoError> {
        Self::new(
            self.latitude + delta.d_lat,
            wrap_longitude(self.longitude + delta.d_lon),
        )
    }
}

/// Maps a longitude back into [-180, 180]; values already in range are unchanged.
fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A latitude/longitude displacement in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateDelta {
    pub d_lat: f64,
    pub d_lon: f64,
}

/// A normalized (Δlat, Δlon) direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub d_lat: f64,
    pub d_lon: f64,
}

impl Direction {
    pub const NORTH: Direction = Direction { d_lat: 1.0, d_lon: 0.0 };
    pub const EAST: Direction = Direction { d_lat: 0.0, d_lon: 1.0 };
    pub const SOUTH: Direction = Direction { d_lat: -1.0, d_lon: 0.0 };
    pub const WEST: Direction = Direction { d_lat: 0.0, d_lon: -1.0 };

    pub fn magnitude(&self) -> f64 {
        self.d_lat.hypot(self.d_lon)
    }
}

/// Rectangular query window: `[min_lon, min_lat, max_lon, max_lat]`.
///
/// Minimum is strictly below maximum on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, GeoError> {
        let ordered = min_lon < max_lon && min_lat < max_lat;
        let finite = [min_lon, min_lat, max_lon, max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !ordered || !finite {
            return Err(GeoError::InvalidBoundingBox {
                min_lon,
                min_lat,
                max_lon,
                max_lat,
            });
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Window of half-width `epsilon` degrees around `center`, clamped to
    /// the valid coordinate range.
    ///
    /// The half-width is a fixed number of degrees, so the covered ground
    /// distance shrinks in longitude away from the equator.
    pub fn around(center: GeoCoordinate, epsilon: f64) -> Result<Self, GeoError> {
        Self::new(
            (center.longitude - epsilon).max(-180.0),
            (center.latitude - epsilon).max(-90.0),
            (center.longitude + epsilon).min(180.0),
            (center.latitude + epsilon).min(90.0),
        )
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn contains(&self, point: GeoCoordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&point.longitude)
            && (self.min_lat..=self.max_lat).contains(&point.latitude)
    }

    /// Query-string form expected by the map API: `min_lon,min_lat,max_lon,max_lat`,
    /// at the API's seven-decimal precision.
    pub fn to_query_value(&self) -> String {
        format!(
            "{:.7},{:.7},{:.7},{:.7}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
