//! Collaborator interfaces for the scene and the text overlay.
//!
//! Rendering itself happens outside this crate. The session only asks for
//! entities to be placed at coordinates, removed, and for overlay text to be
//! shown or cleared.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use log::info;
use serde::Serialize;

use crate::error_handling::PlacementError;
use crate::geo::GeoCoordinate;

/// What an entity represents in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Poi,
    Guide,
    CardinalMarker,
}

/// Opaque handle to a placed entity, issued by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(pub u64);

/// Data attached to a placed entity and delivered back with click events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetadata {
    pub coordinate: GeoCoordinate,
    pub name: Option<String>,
    pub information: Option<String>,
}

impl EntityMetadata {
    /// Metadata with only a coordinate.
    pub fn at(coordinate: GeoCoordinate) -> Self {
        Self {
            coordinate,
            name: None,
            information: None,
        }
    }
}

/// Places and removes geographically anchored entities.
pub trait EntityRenderer: Send + Sync {
    /// Creates an anchor at `coordinate`.
    fn place_entity(
        &self,
        kind: EntityKind,
        coordinate: GeoCoordinate,
        metadata: &EntityMetadata,
    ) -> Result<EntityHandle, PlacementError>;

    /// Removes a previously placed entity. Unknown handles are ignored.
    fn remove_entity(&self, handle: EntityHandle);
}

/// Text shown over the camera view.
pub trait OverlaySink: Send + Sync {
    fn set_overlay_text(&self, text: &str);
    fn clear_overlay_text(&self);
}

/// Renderer that only logs what it is asked to do.
///
/// Used by the CLI, where there is no scene to draw into. Placed metadata is
/// kept so the caller can click an entity afterwards.
#[derive(Debug, Default)]
pub struct LoggingRenderer {
    next_handle: AtomicU64,
    placed: Mutex<Vec<(EntityKind, EntityMetadata)>>,
}

impl LoggingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata of every placed entity of `kind`, in placement order.
    pub fn placed_metadata(&self, kind: EntityKind) -> Vec<EntityMetadata> {
        self.placed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, metadata)| metadata.clone())
            .collect()
    }
}

impl EntityRenderer for LoggingRenderer {
    fn place_entity(
        &self,
        kind: EntityKind,
        coordinate: GeoCoordinate,
        metadata: &EntityMetadata,
    ) -> Result<EntityHandle, PlacementError> {
        let handle = EntityHandle(self.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        info!(
            "Placed {:?} #{} at {} {}",
            kind,
            handle.0,
            coordinate,
            metadata.name.as_deref().unwrap_or("")
        );
        self.placed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, metadata.clone()));
        Ok(handle)
    }

    fn remove_entity(&self, handle: EntityHandle) {
        info!("Removed entity #{}", handle.0);
    }
}

impl OverlaySink for LoggingRenderer {
    fn set_overlay_text(&self, text: &str) {
        info!("Overlay: {text}");
    }

    fn clear_overlay_text(&self) {
        info!("Overlay cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_renderer_issues_distinct_handles() {
        let renderer = LoggingRenderer::new();
        let at = GeoCoordinate::new(1.0, 2.0).unwrap();
        let meta = EntityMetadata::at(at);
        let a = renderer.place_entity(EntityKind::Poi, at, &meta).unwrap();
        let b = renderer.place_entity(EntityKind::Guide, at, &meta).unwrap();
        assert_ne!(a, b);
        renderer.remove_entity(a);
        assert_eq!(renderer.placed_metadata(EntityKind::Guide), [meta]);
    }

    #[test]
    fn test_metadata_serializes_for_host() {
        let meta = EntityMetadata {
            coordinate: GeoCoordinate::new(13.001, 74.79).unwrap(),
            name: Some("Library".into()),
            information: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["name"], "Library");
        assert_eq!(json["coordinate"]["latitude"], 13.001);
        assert!(json["information"].is_null());
    }
}
