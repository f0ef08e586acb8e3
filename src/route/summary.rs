//! Route decoding and summaries.

use log::{debug, info, warn};

use super::types::{HostMessage, RoutePayload};
use crate::error_handling::RouteError;
use crate::geo::GeoCoordinate;

/// Message type carrying a route payload.
pub const ROUTE_MESSAGE_TYPE: &str = "routeData";

/// Decodes a host message, returning the route if it is a `routeData` message.
///
/// # Errors
///
/// `RouteError::Parse` if the text is not a message envelope, or if a
/// `routeData` payload does not match the route schema.
pub fn parse_host_message(text: &str) -> Result<Option<RoutePayload>, RouteError> {
    let message: HostMessage = serde_json::from_str(text)?;
    if message.kind != ROUTE_MESSAGE_TYPE {
        debug!("Ignoring host message of type '{}'", message.kind);
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(message.payload)?))
}

/// Aggregate view of one route step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    pub instruction: String,
    pub distance: f64,
    pub duration: f64,
    /// Where the maneuver happens, if the step has a usable one
    pub maneuver: Option<GeoCoordinate>,
    pub intersections: Vec<GeoCoordinate>,
}

/// Aggregate view of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub start: GeoCoordinate,
    pub end: GeoCoordinate,
    pub steps: Vec<StepSummary>,
    pub total_distance: f64,
    pub total_duration: f64,
}

/// Totals the route and converts intersection locations to coordinates.
///
/// Maneuvers and intersections with out-of-range locations are skipped with
/// a warning.
pub fn summarize_route(route: &RoutePayload) -> RouteSummary {
    let steps: Vec<StepSummary> = route
        .detailed_route_details
        .iter()
        .map(|step| StepSummary {
            instruction: step.instruction.clone(),
            distance: step.distance,
            duration: step.duration,
            maneuver: step
                .maneuver
                .as_ref()
                .and_then(|maneuver| match maneuver.coordinate() {
                    Ok(coordinate) => Some(coordinate),
                    Err(e) => {
                        warn!("Skipping maneuver location: {e}");
                        None
                    }
                }),
            intersections: step
                .intersections
                .iter()
                .filter_map(|intersection| match intersection.coordinate() {
                    Ok(coordinate) => Some(coordinate),
                    Err(e) => {
                        warn!("Skipping intersection: {e}");
                        None
                    }
                })
                .collect(),
        })
        .collect();

    RouteSummary {
        start: route.start_location,
        end: route.end_location,
        total_distance: steps.iter().map(|s| s.distance).sum(),
        total_duration: steps.iter().map(|s| s.duration).sum(),
        steps,
    }
}

/// Logs a route summary step by step.
pub fn log_route(summary: &RouteSummary) {
    info!("Route start: {}", summary.start);
    info!("Route end: {}", summary.end);
    for (index, step) in summary.steps.iter().enumerate() {
        info!(
            "Step {}: {} ({:.0} m, {:.0} s)",
            index + 1,
            step.instruction,
            step.distance,
            step.duration
        );
        if let Some(at) = step.maneuver {
            debug!("  Maneuver at {at}");
        }
        for (i, coordinate) in step.intersections.iter().enumerate() {
            debug!("  Intersection {}: {}", i + 1, coordinate);
        }
    }
    info!(
        "Route total: {} steps, {:.0} m, {:.0} s",
        summary.steps.len(),
        summary.total_distance,
        summary.total_duration
    );
}
