// Recording collaborators for session unit tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::renderer::{EntityHandle, EntityKind, EntityMetadata, EntityRenderer, OverlaySink};
use crate::error_handling::{PlacementError, PositionError, PositionFailure};
use crate::geo::GeoCoordinate;
use crate::position::PositionSource;

/// One call observed by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    Placed {
        kind: EntityKind,
        handle: EntityHandle,
        coordinate: GeoCoordinate,
        name: Option<String>,
    },
    Removed(EntityHandle),
    OverlaySet(String),
    OverlayCleared,
}

/// Renderer and overlay that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: AtomicU64,
    calls: Mutex<Vec<SceneCall>>,
    reject: Option<EntityKind>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer that fails every placement of `kind`.
    pub fn rejecting(kind: EntityKind) -> Self {
        Self {
            reject: Some(kind),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SceneCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn placed(&self, kind: EntityKind) -> Vec<SceneCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SceneCall::Placed { kind: k, .. } if *k == kind))
            .collect()
    }

    pub fn overlay_calls(&self) -> Vec<SceneCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SceneCall::OverlaySet(_) | SceneCall::OverlayCleared))
            .collect()
    }

    pub fn removed(&self) -> Vec<EntityHandle> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SceneCall::Removed(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SceneCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EntityRenderer for RecordingRenderer {
    fn place_entity(
        &self,
        kind: EntityKind,
        coordinate: GeoCoordinate,
        metadata: &EntityMetadata,
    ) -> Result<EntityHandle, PlacementError> {
        if self.reject == Some(kind) {
            return Err(PlacementError(format!("{kind:?} rejected")));
        }
        let handle = EntityHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        self.record(SceneCall::Placed {
            kind,
            handle,
            coordinate,
            name: metadata.name.clone(),
        });
        Ok(handle)
    }

    fn remove_entity(&self, handle: EntityHandle) {
        self.record(SceneCall::Removed(handle));
    }
}

impl OverlaySink for RecordingRenderer {
    fn set_overlay_text(&self, text: &str) {
        self.record(SceneCall::OverlaySet(text.to_string()));
    }

    fn clear_overlay_text(&self) {
        self.record(SceneCall::OverlayCleared);
    }
}

/// Position source that always fails with `reason`.
#[derive(Debug, Clone, Copy)]
pub struct FailingPositionSource {
    pub reason: PositionFailure,
}

impl PositionSource for FailingPositionSource {
    async fn current_position(&self) -> Result<GeoCoordinate, PositionError> {
        Err(PositionError::Unavailable {
            reason: self.reason,
        })
    }
}
