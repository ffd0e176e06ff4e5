//! Pulse count to revolutions-per-minute conversion.

use core::num::NonZeroU32;

const MILLIS_PER_MINUTE: f32 = 60_000.0;

/// Pulses counted over one sampling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleWindow {
    /// Edges drained from the [`PulseCounter`](crate::PulseCounter)
    pub pulses: u32,

    /// Time covered by the window in ms
    pub elapsed_ms: u64,
}

/// Converts a [`SampleWindow`] into RPM for a given disc geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RpmEstimator {
    pulses_per_revolution: NonZeroU32,
}

impl RpmEstimator {
    /// Create an estimator for a disc that produces `pulses_per_revolution`
    /// counted edges per turn.
    pub const fn new(pulses_per_revolution: NonZeroU32) -> Self {
        Self {
            pulses_per_revolution,
        }
    }

    /// Pulses counted for one full revolution
    pub const fn pulses_per_revolution(&self) -> NonZeroU32 {
        self.pulses_per_revolution
    }

    /// Estimate the RPM for `pulses` counted over `elapsed_ms`.
    ///
    /// A window of zero length yields `0.0`.
    pub fn estimate(&self, pulses: u32, elapsed_ms: u64) -> f32 {
        if elapsed_ms == 0 {
            return 0.0;
        }

        let revolutions = pulses as f32 / self.pulses_per_revolution.get() as f32;
        revolutions * MILLIS_PER_MINUTE / elapsed_ms as f32
    }

    /// Estimate the RPM for a [`SampleWindow`].
    pub fn estimate_window(&self, window: SampleWindow) -> f32 {
        self.estimate(window.pulses, window.elapsed_ms)
    }
}

impl Default for RpmEstimator {
    fn default() -> Self {
        Self::new(NonZeroU32::MIN)
    }
}
