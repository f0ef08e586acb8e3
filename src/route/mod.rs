//! Route-data messages from the hosting page.
//!
//! A `routeData` message carries a directions response; the session decodes
//! it, totals it, and logs each step. Other message types are ignored.

mod summary;
mod types;

// Re-export public API
pub use summary::{
    log_route, parse_host_message, summarize_route, RouteSummary, StepSummary, ROUTE_MESSAGE_TYPE,
};
pub use types::{HostMessage, Intersection, LonLat, Maneuver, RoutePayload, RouteStep};
