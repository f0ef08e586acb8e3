//! Per-session orchestration.
//!
//! The session ingests nearby features once, on the first camera-position
//! update, and afterwards reacts to POI clicks by showing overlay text and
//! placing a short-lived guide entity toward the clicked POI.

mod controller;
mod gate;
mod renderer;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export public API
pub use controller::{
    CameraUpdateOutcome, GuideOutcome, IngestError, IngestReport, SessionController, SessionEvent,
};
pub use gate::SessionUpdateGate;
pub use renderer::{
    EntityHandle, EntityKind, EntityMetadata, EntityRenderer, LoggingRenderer, OverlaySink,
};
