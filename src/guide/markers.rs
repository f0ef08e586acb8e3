//! Cardinal marker positions.

use crate::error_handling::GeoError;
use crate::geo::{meters_to_degree_offset, Direction, GeoCoordinate};

/// The four compass points with their labels, clockwise from north.
pub const CARDINAL_POINTS: [(&str, Direction); 4] = [
    ("N", Direction::NORTH),
    ("E", Direction::EAST),
    ("S", Direction::SOUTH),
    ("W", Direction::WEST),
];

/// Positions `distance_m` meters north, east, south, and west of `center`.
pub fn cardinal_marker_positions(
    center: GeoCoordinate,
    distance_m: f64,
) -> Result<Vec<(&'static str, GeoCoordinate)>, GeoError> {
    CARDINAL_POINTS
        .iter()
        .map(|(label, direction)| {
            let delta = meters_to_degree_offset(distance_m, center.latitude(), *direction)?;
            Ok((*label, center.offset(delta)?))
        })
        .collect()
}
