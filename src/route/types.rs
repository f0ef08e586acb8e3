//! Route payload data structures.
//!
//! Mirrors the `routeData` message posted by the hosting page: start and end
//! locations plus the turn-by-turn steps of a directions response.

use serde::Deserialize;

use crate::error_handling::GeoError;
use crate::geo::GeoCoordinate;

/// `[longitude, latitude]` pair as sent by the directions service.
pub type LonLat = [f64; 2];

fn lon_lat_to_coordinate(location: LonLat) -> Result<GeoCoordinate, GeoError> {
    GeoCoordinate::new(location[1], location[0])
}

/// Envelope of a message from the hosting page.
#[derive(Debug, Deserialize)]
pub struct HostMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Route between two locations with its detailed steps.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePayload {
    pub start_location: GeoCoordinate,
    pub end_location: GeoCoordinate,
    #[serde(default)]
    pub detailed_route_details: Vec<RouteStep>,
}

/// One instruction of the route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    #[serde(default)]
    pub maneuver: Option<Maneuver>,
    #[serde(default)]
    pub intersections: Vec<Intersection>,
    #[serde(default)]
    pub travel_mode: Option<String>,
    #[serde(default)]
    pub maneuver_type: Option<String>,
    #[serde(default)]
    pub step_index: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Maneuver {
    #[serde(default)]
    pub bearing_after: f64,
    #[serde(default)]
    pub bearing_before: f64,
    #[serde(default)]
    pub instruction: String,
    pub location: LonLat,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Maneuver {
    pub fn coordinate(&self) -> Result<GeoCoordinate, GeoError> {
        lon_lat_to_coordinate(self.location)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intersection {
    pub location: LonLat,
    #[serde(default)]
    pub bearings: Vec<f64>,
    #[serde(default)]
    pub entry: Vec<bool>,
    #[serde(default)]
    pub is_urban: bool,
}

impl Intersection {
    pub fn coordinate(&self) -> Result<GeoCoordinate, GeoError> {
        lon_lat_to_coordinate(self.location)
    }
}
