//! Guide position computation.

use crate::error_handling::{GeoError, GuideError};
use crate::geo::{distance, meters_to_degree_offset, unit_direction, GeoCoordinate};
use crate::position::PositionSource;

/// A guide placement computed for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideOffset {
    pub coordinate: GeoCoordinate,
    pub distance_meters: f64,
}

/// Computes where the guide entity goes, sampling the current position
/// once per request.
#[derive(Debug, Clone)]
pub struct GuidePositioner<P> {
    source: P,
}

impl<P: PositionSource> GuidePositioner<P> {
    pub fn new(source: P) -> Self {
        Self { source }
    }

    /// Samples the current position and offsets it `displacement_m` meters
    /// toward `target`.
    ///
    /// # Errors
    ///
    /// - `GuideError::Position` if the position read fails (not retried)
    /// - `GuideError::Geo` if `target` coincides with the current position
    pub async fn compute_guide_position(
        &self,
        target: GeoCoordinate,
        displacement_m: f64,
    ) -> Result<GuideOffset, GuideError> {
        let current = self.source.current_position().await?;
        Ok(guide_offset_from(current, target, displacement_m)?)
    }
}

/// Offsets `current` by `displacement_m` meters in the direction of `target`.
///
/// Direction and distance use the flat-earth approximation; the longitude
/// correction uses the current latitude.
pub fn guide_offset_from(
    current: GeoCoordinate,
    target: GeoCoordinate,
    displacement_m: f64,
) -> Result<GuideOffset, GeoError> {
    if distance(target, current) == 0.0 {
        return Err(GeoError::DegenerateInput("target coincides with current position"));
    }
    let direction = unit_direction(current, target)?;
    let delta = meters_to_degree_offset(displacement_m, current.latitude(), direction)?;
    Ok(GuideOffset {
        coordinate: current.offset(delta)?,
        distance_meters: displacement_m,
    })
}
