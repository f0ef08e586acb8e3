//! Session controller: routes camera, click, and host events through the
//! ingestion and guide pipelines.

use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::gate::SessionUpdateGate;
use super::renderer::{EntityKind, EntityMetadata, EntityRenderer, OverlaySink};
use crate::config::Config;
use crate::error_handling::{
    categorize_geo_error, categorize_guide_error, update_error_stats, ErrorType, FeedError,
    GeoError, GuideError, InfoType, InitializationError, PlacementError, ProcessingStats,
};
use crate::feed::FeedClient;
use crate::geo::GeoCoordinate;
use crate::guide::{cardinal_marker_positions, GuideOffset, GuidePositioner, GuideSlot, SlotPlacement};
use crate::initialization::init_client;
use crate::poi::extract_pois;
use crate::position::PositionSource;
use crate::route::{log_route, parse_host_message, summarize_route, RouteSummary};

/// Events delivered to the session, one at a time.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The camera's estimated geographic position changed.
    CameraPositionUpdate(GeoCoordinate),
    /// The user tapped a placed entity.
    EntityClicked {
        kind: EntityKind,
        metadata: EntityMetadata,
    },
    /// A raw JSON message from the hosting page.
    HostMessage(String),
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub nodes_received: usize,
    pub nodes_skipped: usize,
    pub pois_found: usize,
    pub pois_placed: usize,
    pub markers_placed: usize,
}

/// What happened to a camera-position update.
#[derive(Debug)]
pub enum CameraUpdateOutcome {
    /// The gate had already fired; nothing ran.
    Dropped,
    /// The pipeline ran to completion.
    Ingested(IngestReport),
    /// The pipeline aborted. The gate stays fired.
    Failed(IngestError),
}

/// Why an ingestion run aborted.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// What happened to a guide request.
#[derive(Debug, PartialEq)]
pub enum GuideOutcome {
    /// A guide entity was placed and its removal scheduled.
    Placed(GuideOffset),
    /// A guide is already in the scene; the request was dropped.
    Ignored,
    /// The guide position could not be computed.
    Failed(GuideError),
    /// The renderer rejected the guide entity.
    Rejected(PlacementError),
    /// The click was not on a POI.
    NotApplicable,
}

/// Owns the per-session state: the ingestion gate, the guide slot, pending
/// timers, and failure counters.
///
/// Handlers are meant to be driven sequentially by [`run`](Self::run); the
/// only concurrent work is the timers it spawns.
pub struct SessionController<P> {
    config: Config,
    feed: FeedClient,
    positioner: GuidePositioner<P>,
    renderer: Arc<dyn EntityRenderer>,
    overlay: Arc<dyn OverlaySink>,
    gate: SessionUpdateGate,
    guide: Arc<GuideSlot>,
    stats: Arc<ProcessingStats>,
    timers: TaskTracker,
    cancel: CancellationToken,
}

impl<P: PositionSource> SessionController<P> {
    pub fn new(
        config: Config,
        feed: FeedClient,
        position_source: P,
        renderer: Arc<dyn EntityRenderer>,
        overlay: Arc<dyn OverlaySink>,
    ) -> Self {
        Self {
            config,
            feed,
            positioner: GuidePositioner::new(position_source),
            renderer,
            overlay,
            gate: SessionUpdateGate::new(),
            guide: Arc::new(GuideSlot::new()),
            stats: Arc::new(ProcessingStats::new()),
            timers: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Validates `config`, builds the HTTP client and feed client, and
    /// creates a controller.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the config is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(
        config: Config,
        position_source: P,
        renderer: Arc<dyn EntityRenderer>,
        overlay: Arc<dyn OverlaySink>,
    ) -> Result<Self, InitializationError> {
        config.validate()?;
        let client = init_client(&config)?;
        let feed = FeedClient::new(client, &config)?;
        Ok(Self::new(config, feed, position_source, renderer, overlay))
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &SessionUpdateGate {
        &self.gate
    }

    pub fn guide_present(&self) -> bool {
        self.guide.is_occupied()
    }

    /// Handles events until the stream ends.
    pub async fn run<S>(&self, mut events: S)
    where
        S: Stream<Item = SessionEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
        }
    }

    pub async fn handle_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::CameraPositionUpdate(position) => {
                self.on_camera_position_update(position).await;
            }
            SessionEvent::EntityClicked { kind, metadata } => {
                self.on_entity_clicked(kind, &metadata).await;
            }
            SessionEvent::HostMessage(text) => {
                self.on_host_message(&text);
            }
        }
    }

    /// Runs the ingestion pipeline for the first update of the session only.
    pub async fn on_camera_position_update(&self, position: GeoCoordinate) -> CameraUpdateOutcome {
        if !self.gate.admit_once() {
            debug!("Ingestion already ran; dropping camera update at {position}");
            self.stats.increment_info(InfoType::CameraUpdateDropped);
            return CameraUpdateOutcome::Dropped;
        }

        info!("First camera position {position}; fetching nearby features");
        match self.ingest(position).await {
            Ok(report) => {
                info!(
                    "Ingestion complete: {} nodes, {} POIs, {} placed",
                    report.nodes_received, report.pois_found, report.pois_placed
                );
                CameraUpdateOutcome::Ingested(report)
            }
            Err(e) => {
                error!("Error fetching and processing map data: {e}");
                match &e {
                    IngestError::Feed(feed_error) => update_error_stats(&self.stats, feed_error),
                    IngestError::Geo(geo_error) => {
                        self.stats.increment_error(categorize_geo_error(geo_error))
                    }
                }
                CameraUpdateOutcome::Failed(e)
            }
        }
    }

    async fn ingest(&self, position: GeoCoordinate) -> Result<IngestReport, IngestError> {
        let bbox = self.feed.query_box(position)?;
        let doc = self.feed.fetch_features(&bbox).await?;

        let mut report = IngestReport {
            nodes_received: doc.len(),
            nodes_skipped: doc.skipped(),
            ..Default::default()
        };
        self.stats
            .add_info(InfoType::FeedNodeSkipped, report.nodes_skipped);
        let outside = doc
            .nodes()
            .iter()
            .filter(|node| !bbox.contains(node.coordinate))
            .count();
        if outside > 0 {
            // The map API also returns nodes of ways that cross the window
            debug!("{outside} node(s) lie outside the query window");
        }
        let pois = extract_pois(doc);
        report.pois_found = pois.len();
        info!(
            "{} of {} nodes carry a name",
            report.pois_found, report.nodes_received
        );

        if self.config.cardinal_markers {
            report.markers_placed = self.place_cardinal_markers(position);
        }

        for poi in &pois {
            match self
                .renderer
                .place_entity(EntityKind::Poi, poi.coordinate, &poi.metadata())
            {
                Ok(handle) => {
                    debug!("Placed POI '{}' at {} as #{}", poi.name, poi.coordinate, handle.0);
                    self.stats.increment_info(InfoType::PoiPlaced);
                    report.pois_placed += 1;
                }
                Err(e) => {
                    warn!("Could not place POI '{}': {e}", poi.name);
                    self.stats.increment_error(ErrorType::PlacementError);
                }
            }
        }

        Ok(report)
    }

    fn place_cardinal_markers(&self, center: GeoCoordinate) -> usize {
        let positions =
            match cardinal_marker_positions(center, self.config.cardinal_marker_distance_m) {
                Ok(positions) => positions,
                Err(e) => {
                    warn!("Skipping cardinal markers around {center}: {e}");
                    self.stats.increment_error(categorize_geo_error(&e));
                    return 0;
                }
            };

        let mut placed = 0;
        for (label, coordinate) in positions {
            let metadata = EntityMetadata {
                name: Some(label.to_string()),
                ..EntityMetadata::at(coordinate)
            };
            match self
                .renderer
                .place_entity(EntityKind::CardinalMarker, coordinate, &metadata)
            {
                Ok(_) => {
                    self.stats.increment_info(InfoType::CardinalMarkerPlaced);
                    placed += 1;
                }
                Err(e) => {
                    warn!("Could not place cardinal marker {label}: {e}");
                    self.stats.increment_error(ErrorType::PlacementError);
                }
            }
        }
        placed
    }

    /// Shows the POI's overlay text and places a guide toward it.
    pub async fn on_entity_clicked(
        &self,
        kind: EntityKind,
        metadata: &EntityMetadata,
    ) -> GuideOutcome {
        if kind != EntityKind::Poi {
            debug!("Ignoring click on {kind:?} entity");
            return GuideOutcome::NotApplicable;
        }

        self.schedule_overlay(metadata);
        self.request_guide(metadata.coordinate).await
    }

    /// Overlay timeline for a click: name now, cleared after the name delay;
    /// information (if any) shown after its delay and cleared after its own.
    fn schedule_overlay(&self, metadata: &EntityMetadata) {
        if let Some(name) = metadata.name.as_deref().filter(|n| !n.is_empty()) {
            self.overlay.set_overlay_text(name);
        }

        let overlay = Arc::clone(&self.overlay);
        self.spawn_after(
            Duration::from_millis(self.config.overlay_name_clear_ms),
            move || overlay.clear_overlay_text(),
        );

        if let Some(information) = metadata.information.clone().filter(|i| !i.is_empty()) {
            let overlay = Arc::clone(&self.overlay);
            self.spawn_after(
                Duration::from_millis(self.config.overlay_info_delay_ms),
                move || overlay.set_overlay_text(&information),
            );
            let overlay = Arc::clone(&self.overlay);
            self.spawn_after(
                Duration::from_millis(self.config.overlay_info_clear_ms),
                move || overlay.clear_overlay_text(),
            );
        }
    }

    /// Computes a guide position toward `target` and places the guide if
    /// none is present.
    pub async fn request_guide(&self, target: GeoCoordinate) -> GuideOutcome {
        let offset = match self
            .positioner
            .compute_guide_position(target, self.config.guide_displacement_m)
            .await
        {
            Ok(offset) => offset,
            Err(e) => {
                warn!("Guide placement toward {target} aborted: {e}");
                self.stats.increment_error(categorize_guide_error(&e));
                return GuideOutcome::Failed(e);
            }
        };

        // No await between checking the slot and filling it
        let metadata = EntityMetadata::at(offset.coordinate);
        let placement = self.guide.try_place(|| {
            self.renderer
                .place_entity(EntityKind::Guide, offset.coordinate, &metadata)
        });

        match placement {
            Ok(SlotPlacement::Placed(handle)) => {
                info!(
                    "Guide #{} placed at {} ({} m toward {})",
                    handle.0, offset.coordinate, offset.distance_meters, target
                );
                self.stats.increment_info(InfoType::GuidePlaced);
                self.schedule_guide_removal();
                GuideOutcome::Placed(offset)
            }
            Ok(SlotPlacement::Occupied) => {
                debug!("Guide already present; ignoring request toward {target}");
                self.stats.increment_info(InfoType::GuideRequestIgnored);
                GuideOutcome::Ignored
            }
            Err(e) => {
                warn!("Could not place guide: {e}");
                self.stats.increment_error(ErrorType::PlacementError);
                GuideOutcome::Rejected(e)
            }
        }
    }

    /// Removes whatever guide is in the slot once the lifetime elapses.
    // TODO: decide whether a request arriving while a guide is shown should
    // extend the lifetime or replace the guide instead of being ignored.
    fn schedule_guide_removal(&self) {
        let guide = Arc::clone(&self.guide);
        let renderer = Arc::clone(&self.renderer);
        let stats = Arc::clone(&self.stats);
        self.spawn_after(self.config.guide_lifetime(), move || {
            if let Some(handle) = guide.take() {
                renderer.remove_entity(handle);
                stats.increment_info(InfoType::GuideRemoved);
                debug!("Guide #{} removed", handle.0);
            }
        });
    }

    fn spawn_after(&self, delay: Duration, action: impl FnOnce() + Send + 'static) {
        let cancel = self.cancel.clone();
        self.timers.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => action(),
            }
        });
    }

    /// Decodes a host message and logs the route it carries, if any.
    pub fn on_host_message(&self, text: &str) -> Option<RouteSummary> {
        match parse_host_message(text) {
            Ok(Some(route)) => {
                let summary = summarize_route(&route);
                log_route(&summary);
                self.stats.increment_info(InfoType::RouteReceived);
                Some(summary)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring malformed host message: {e}");
                self.stats.increment_error(ErrorType::RouteParseError);
                None
            }
        }
    }

    /// Waits until every pending overlay and guide timer has fired.
    pub async fn wait_for_timers(&self) {
        self.timers.close();
        self.timers.wait().await;
        self.timers.reopen();
    }

    /// Cancels pending timers, removes the live guide, and clears the overlay.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.timers.close();
        self.timers.wait().await;

        if let Some(handle) = self.guide.take() {
            self.renderer.remove_entity(handle);
            self.stats.increment_info(InfoType::GuideRemoved);
        }
        self.overlay.clear_overlay_text();
    }
}
