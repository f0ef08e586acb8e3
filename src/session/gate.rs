//! One-shot ingestion gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// Latch that admits exactly one camera-position update per session.
///
/// Starts idle; the first [`admit_once`](Self::admit_once) call fires it and
/// every later call is refused. There is no reset.
#[derive(Debug, Default)]
pub struct SessionUpdateGate {
    fired: AtomicBool,
}

impl SessionUpdateGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller only.
    pub fn admit_once(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}
