//! poi_guide library: nearby points of interest and guide placement
//!
//! This library fetches map features around the device's first reported
//! position, keeps the named ones as points of interest, and on a POI click
//! places a short-lived guide entity a few meters toward it.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use poi_guide::{run_session, Opt};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opt = Opt::parse_from(["poi_guide", "--latitude", "13.0", "--longitude", "74.79", "--select", "0"]);
//! let report = run_session(opt).await?;
//! println!("Placed {} POIs and {} guide(s)", report.pois_placed, report.guides_placed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime: the session spawns its overlay and
//! guide timers onto it.

pub mod config;
pub mod error_handling;
pub mod feed;
pub mod geo;
pub mod guide;
pub mod initialization;
pub mod poi;
pub mod position;
pub mod route;
pub mod session;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{
    FeedError, GeoError, GuideError, InitializationError, PlacementError, PositionError,
    RouteError,
};
pub use geo::GeoCoordinate;
pub use run::{run_session, SessionReport};
pub use session::{SessionController, SessionEvent};

// Internal run module (drives one session from the command line)
mod run {
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::{info, warn};

    use crate::config::Opt;
    use crate::error_handling::{ErrorType, InfoType};
    use crate::geo::GeoCoordinate;
    use crate::position::{serve_fixed_position, SensorPositionSource};
    use crate::session::{
        EntityKind, EntityRenderer, LoggingRenderer, OverlaySink, SessionController, SessionEvent,
    };

    /// Outcome of one command-line session.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SessionReport {
        /// POIs placed by the ingestion run
        pub pois_placed: usize,
        /// Cardinal markers placed around the first position
        pub markers_placed: usize,
        /// Camera updates dropped by the ingestion gate
        pub updates_dropped: usize,
        /// Guide entities placed
        pub guides_placed: usize,
        /// Route messages decoded
        pub routes_received: usize,
        /// Failures of any kind
        pub errors: usize,
        /// Whether the feed query failed
        pub feed_failed: bool,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs one session at a fixed position.
    ///
    /// The position is reported twice as a camera update (the second is
    /// dropped by the gate). If `opt.route_file` is set its contents are
    /// delivered as a host message. If `opt.select` is set, the POI at that
    /// index is clicked and the session waits for the overlay and guide timers
    /// before shutting down.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate or configuration is invalid, the
    /// HTTP client cannot be built, or the route file cannot be read. Feed and
    /// guide failures are logged and counted in the report instead.
    pub async fn run_session(opt: Opt) -> Result<SessionReport> {
        let start = Instant::now();
        let position = GeoCoordinate::new(opt.latitude, opt.longitude)
            .context("Invalid --latitude/--longitude")?;

        let (source, requests) = SensorPositionSource::channel(8);
        let sensor = tokio::spawn(serve_fixed_position(requests, Ok(position)));

        let renderer = Arc::new(LoggingRenderer::new());
        let scene: Arc<dyn EntityRenderer> = renderer.clone();
        let overlay: Arc<dyn OverlaySink> = renderer.clone();
        let session = SessionController::from_config(opt.config, source, scene, overlay)
            .context("Failed to initialize session")?;

        let mut events = vec![
            SessionEvent::CameraPositionUpdate(position),
            SessionEvent::CameraPositionUpdate(position),
        ];
        if let Some(path) = &opt.route_file {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read route file {}", path.display()))?;
            events.push(SessionEvent::HostMessage(text));
        }
        session.run(futures::stream::iter(events)).await;

        if let Some(index) = opt.select {
            let pois = renderer.placed_metadata(EntityKind::Poi);
            match pois.get(index) {
                Some(metadata) => {
                    info!(
                        "Selecting POI {index}: {}",
                        metadata.name.as_deref().unwrap_or("")
                    );
                    session
                        .handle_event(SessionEvent::EntityClicked {
                            kind: EntityKind::Poi,
                            metadata: metadata.clone(),
                        })
                        .await;
                    session.wait_for_timers().await;
                }
                None => warn!("No POI at index {index} ({} placed)", pois.len()),
            }
        }

        session.shutdown().await;
        sensor.abort();

        let stats = session.stats();
        info!("Session summary:");
        stats.log_summary();

        let feed_failed = [
            ErrorType::FeedConnectError,
            ErrorType::FeedTimeoutError,
            ErrorType::FeedStatusError,
            ErrorType::FeedBodyError,
            ErrorType::FeedOtherError,
            ErrorType::FeedParseError,
        ]
        .into_iter()
        .any(|t| stats.get_error_count(t) > 0);

        Ok(SessionReport {
            pois_placed: stats.get_info_count(InfoType::PoiPlaced),
            markers_placed: stats.get_info_count(InfoType::CardinalMarkerPlaced),
            updates_dropped: stats.get_info_count(InfoType::CameraUpdateDropped),
            guides_placed: stats.get_info_count(InfoType::GuidePlaced),
            routes_received: stats.get_info_count(InfoType::RouteReceived),
            errors: stats.total_errors(),
            feed_failed,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
