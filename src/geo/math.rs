//! Flat-earth coordinate math.
//!
//! Latitude/longitude pairs are treated as Cartesian coordinates. This is only
//! a good approximation for short distances near the equator; the results are
//! in degrees, not meters, unless converted explicitly with
//! [`meters_to_degree_offset`].

use super::coordinate::{CoordinateDelta, Direction, GeoCoordinate};
use crate::config::METERS_PER_DEGREE;
use crate::error_handling::GeoError;

/// Smallest |cos(latitude)| for which a longitude correction is defined.
const MIN_LONGITUDE_SCALE: f64 = 1e-12;

/// Planar distance between two coordinates, in degrees.
///
/// Euclidean distance over the raw (latitude, longitude) pair. Not a
/// great-circle distance.
pub fn distance(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    (a.latitude() - b.latitude()).hypot(a.longitude() - b.longitude())
}

/// Normalized (Δlat, Δlon) direction from `from` to `to`.
///
/// # Errors
///
/// `GeoError::DegenerateInput` when both points are equal.
pub fn unit_direction(from: GeoCoordinate, to: GeoCoordinate) -> Result<Direction, GeoError> {
    let length = distance(from, to);
    if length == 0.0 {
        return Err(GeoError::DegenerateInput(
            "direction between identical coordinates",
        ));
    }
    Ok(Direction {
        d_lat: (to.latitude() - from.latitude()) / length,
        d_lon: (to.longitude() - from.longitude()) / length,
    })
}

/// Converts a metric displacement along `direction` into a degree delta.
///
/// Uses 111 111 meters per degree of latitude; longitude is scaled by the
/// cosine of `at_latitude`, which must be the latitude the offset is applied
/// at (the current position, not the target).
///
/// # Errors
///
/// `GeoError::DegenerateInput` when `meters` is not finite, when `direction`
/// has zero or non-finite length, or when `at_latitude` is at a pole and the
/// longitude scale vanishes.
pub fn meters_to_degree_offset(
    meters: f64,
    at_latitude: f64,
    direction: Direction,
) -> Result<CoordinateDelta, GeoError> {
    if !meters.is_finite() {
        return Err(GeoError::DegenerateInput("non-finite displacement"));
    }
    let length = direction.magnitude();
    if !length.is_finite() || length == 0.0 {
        return Err(GeoError::DegenerateInput("zero-length direction"));
    }
    let longitude_scale = at_latitude.to_radians().cos();
    if longitude_scale.abs() < MIN_LONGITUDE_SCALE {
        return Err(GeoError::DegenerateInput(
            "longitude offset undefined at a pole",
        ));
    }
    Ok(CoordinateDelta {
        d_lat: (meters / METERS_PER_DEGREE) * direction.d_lat,
        d_lon: (meters / (METERS_PER_DEGREE * longitude_scale)) * direction.d_lon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).expect("valid test coordinate")
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (13.0, 74.79), (-89.9, 179.9)] {
            let a = coord(lat, lon);
            assert_eq!(distance(a, a), 0.0);
            assert!(matches!(
                unit_direction(a, a),
                Err(GeoError::DegenerateInput(_))
            ));
        }
    }

    #[test]
    fn test_distance_is_planar() {
        let a = coord(0.0, 0.0);
        let b = coord(3.0, 4.0);
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_unit_direction_has_unit_magnitude() {
        let pairs = [
            ((13.0, 74.79), (13.001, 74.79)),
            ((13.0, 74.79), (12.0, 75.5)),
            ((-45.0, -120.0), (-44.9999, -120.0002)),
            ((0.0, 0.0), (0.0, 1e-9)),
        ];
        for ((alat, alon), (blat, blon)) in pairs {
            let dir = unit_direction(coord(alat, alon), coord(blat, blon)).unwrap();
            assert!((dir.magnitude() - 1.0).abs() < 1e-9, "{dir:?}");
        }
    }

    #[test]
    fn test_unit_direction_points_north() {
        let dir = unit_direction(coord(13.0, 74.79), coord(13.001, 74.79)).unwrap();
        assert!((dir.d_lat - 1.0).abs() < 1e-12);
        assert_eq!(dir.d_lon, 0.0);
    }

    #[test]
    fn test_meters_to_degree_offset_at_equator() {
        let delta = meters_to_degree_offset(111_111.0, 0.0, Direction::EAST).unwrap();
        assert_eq!(delta.d_lat, 0.0);
        assert!((delta.d_lon - 1.0).abs() < 1e-12);

        let delta = meters_to_degree_offset(2.0, 0.0, Direction::NORTH).unwrap();
        assert!((delta.d_lat - 2.0 / 111_111.0).abs() < 1e-15);
    }

    #[test]
    fn test_meters_to_degree_offset_widens_longitude_with_latitude() {
        let delta = meters_to_degree_offset(10.0, 60.0, Direction::EAST).unwrap();
        // cos(60°) = 0.5, so a longitude degree covers half the ground distance.
        assert!((delta.d_lon - 2.0 * 10.0 / 111_111.0).abs() < 1e-12);
    }

    #[test]
    fn test_meters_to_degree_offset_rejects_zero_direction() {
        let still = Direction { d_lat: 0.0, d_lon: 0.0 };
        assert!(matches!(
            meters_to_degree_offset(2.0, 13.0, still),
            Err(GeoError::DegenerateInput(_))
        ));
        let broken = Direction { d_lat: f64::NAN, d_lon: 1.0 };
        assert!(meters_to_degree_offset(2.0, 13.0, broken).is_err());
    }

    #[test]
    fn test_meters_to_degree_offset_rejects_pole() {
        assert!(meters_to_degree_offset(2.0, 90.0, Direction::NORTH).is_err());
        assert!(meters_to_degree_offset(f64::NAN, 0.0, Direction::NORTH).is_err());
    }
}
