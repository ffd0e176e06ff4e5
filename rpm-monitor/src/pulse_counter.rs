//! # Pulse counter
//!
//! ## Overview
//! Counts sensor edges from interrupt context and hands the accumulated count
//! to the foreground loop once per sampling window.
//!
//! The counter is meant to live in a `static` so that the GPIO interrupt
//! handler and the foreground loop can share it without a lock:
//!
//! ```rust,ignore
//! static PULSES: PulseCounter = PulseCounter::new();
//!
//! #[handler]
//! fn on_sensor_edge() {
//!     PULSES.on_edge();
//!     // clear the pin interrupt here
//! }
//! ```
//!
//! Draining is a single atomic swap, so an edge that races with
//! [`PulseCounter::take_and_reset`] is counted in exactly one of the two
//! adjacent windows. On targets without atomic read-modify-write instructions
//! enable the `critical-section` feature.

use portable_atomic::{AtomicU32, Ordering};

/// Edge counter shared between an interrupt handler and the sampling loop
#[derive(Debug, Default)]
pub struct PulseCounter {
    pulses: AtomicU32,
}

impl PulseCounter {
    /// Creates a counter starting at zero.
    pub const fn new() -> Self {
        Self {
            pulses: AtomicU32::new(0),
        }
    }

    /// Records one sensor edge.
    ///
    /// Never blocks; safe to call from an interrupt handler that preempts
    /// [`PulseCounter::take_and_reset`].
    #[inline]
    pub fn on_edge(&self) {
        self.pulses.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of edges since the previous call and restarts the
    /// count from zero.
    #[inline]
    pub fn take_and_reset(&self) -> u32 {
        self.pulses.swap(0, Ordering::AcqRel)
    }
}
