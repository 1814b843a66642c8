//! Debounced viewport persistence.
//!
//! Pan and zoom fire `ViewportChanged` on every tick; writing each one
//! through would hammer the external store. The saver coalesces a
//! burst into a single save once input has been quiet for
//! [`DEBOUNCE_MS`]. Local state is not involved — the host applies
//! viewport changes immediately and only the external write waits.
//!
//! Cooperative, no timers: the host calls [`ViewportSaver::poll`] from
//! its frame loop (or any periodic tick) with its monotonic clock in
//! milliseconds (`performance.now()` in a browser host). The released
//! save is fire-and-forget; the saver never awaits or retries it.

use gf_core::model::Viewport;

/// Quiescence window before a pending viewport is released for saving.
pub const DEBOUNCE_MS: f64 = 500.0;

/// Coalesces viewport changes into one save per quiet period.
#[derive(Debug, Default)]
pub struct ViewportSaver {
    pending: Option<Viewport>,
    last_change_ms: Option<f64>,
}

impl ViewportSaver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a viewport change. Restarts the quiescence window.
    pub fn note(&mut self, viewport: Viewport, now_ms: f64) {
        self.pending = Some(viewport);
        self.last_change_ms = Some(now_ms);
    }

    /// Release the latest pending viewport if the burst has quiesced.
    /// Returns at most one value per burst.
    pub fn poll(&mut self, now_ms: f64) -> Option<Viewport> {
        let changed_at = self.last_change_ms?;
        if now_ms - changed_at >= DEBOUNCE_MS {
            self.last_change_ms = None;
            self.pending.take()
        } else {
            None
        }
    }

    /// Force-release the pending viewport regardless of the window
    /// (e.g. on unmount, so the last state is not lost).
    pub fn flush(&mut self) -> Option<Viewport> {
        self.last_change_ms = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
