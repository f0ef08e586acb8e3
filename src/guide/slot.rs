//! Single guide-entity slot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error_handling::PlacementError;
use crate::session::EntityHandle;

/// Holds the handle of the guide entity currently in the scene, if any.
///
/// Checking and filling the slot happen under one lock with no await in
/// between, so two requests cannot both see it empty.
#[derive(Debug, Default)]
pub struct GuideSlot {
    current: Mutex<Option<EntityHandle>>,
}

/// Result of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPlacement {
    /// The slot was empty and now holds this handle.
    Placed(EntityHandle),
    /// A guide is already present; nothing was placed.
    Occupied,
}

impl GuideSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<EntityHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `place` only if the slot is empty, storing the new handle.
    pub fn try_place(
        &self,
        place: impl FnOnce() -> Result<EntityHandle, PlacementError>,
    ) -> Result<SlotPlacement, PlacementError> {
        let mut current = self.lock();
        if current.is_some() {
            return Ok(SlotPlacement::Occupied);
        }
        let handle = place()?;
        *current = Some(handle);
        Ok(SlotPlacement::Placed(handle))
    }

    /// Empties the slot, returning the handle that was in it.
    pub fn take(&self) -> Option<EntityHandle> {
        self.lock().take()
    }

    pub fn is_occupied(&self) -> bool {
        self.lock().is_some()
    }
}
