//! # Monitor configuration
//!
//! ## Overview
//! Everything the monitor needs to know about the physical setup and the
//! alert behaviour is collected in one immutable [`Config`], handed to the
//! [`SamplingLoop`](crate::SamplingLoop) when it is created. Start from
//! [`Config::default`] and override what differs:
//!
//! ```rust
//! use core::num::NonZeroU32;
//!
//! use rpm_monitor::{AlertBand, Config};
//!
//! let config = Config::default()
//!     .with_pulses_per_revolution(NonZeroU32::new(2).unwrap())
//!     .with_alert_band(AlertBand::new(0.0, 600.0));
//!
//! assert!(config.validate().is_ok());
//! ```

use core::num::NonZeroU32;

use crate::{ToneValue, notes::ALERT_MELODY};

/// Open RPM range in which the alert fires
///
/// Both bounds are exclusive: a stopped rotor (`0.0`) and a value equal to
/// `high` do not alert.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertBand {
    low: f32,
    high: f32,
}

impl AlertBand {
    /// The band between `low` and `high`, both excluded.
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Lower bound, excluded
    pub const fn low(&self) -> f32 {
        self.low
    }

    /// Upper bound, excluded
    pub const fn high(&self) -> f32 {
        self.high
    }

    /// Whether `rpm` lies strictly between the bounds. `NaN` never does.
    pub fn contains(&self, rpm: f32) -> bool {
        rpm > self.low && rpm < self.high
    }

    fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }
}

impl Default for AlertBand {
    fn default() -> Self {
        Self::new(0.0, 400.0)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The alert band is empty or has a non-finite bound
    InvalidAlertBand,

    /// The sampling interval is 0 ms
    ZeroSampleInterval,

    /// The alert message has no characters to draw
    EmptyAlertMessage,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidAlertBand => write!(f, "alert band must satisfy low < high"),
            ConfigError::ZeroSampleInterval => write!(f, "sample interval must be non-zero"),
            ConfigError::EmptyAlertMessage => write!(f, "alert message must not be empty"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Monitor configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub struct Config {
    pulses_per_revolution: NonZeroU32,
    alert_band: AlertBand,
    sample_interval_ms: u32,
    inter_note_pause_ms: u32,
    melody: &'static [ToneValue],
    alert_message: &'static str,
    alert_hold_ms: u32,
    startup_banner: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pulses_per_revolution: NonZeroU32::MIN,
            alert_band: AlertBand::default(),
            sample_interval_ms: 1000,
            inter_note_pause_ms: 50,
            melody: &ALERT_MELODY,
            alert_message: "    Alert!    ",
            alert_hold_ms: 1000,
            startup_banner: "RPM monitor",
        }
    }
}

impl Config {
    /// Counted edges per revolution of the disc. Defaults to 1.
    pub const fn pulses_per_revolution(&self) -> NonZeroU32 {
        self.pulses_per_revolution
    }

    /// Set the counted edges per revolution of the disc.
    pub const fn with_pulses_per_revolution(mut self, pulses_per_revolution: NonZeroU32) -> Self {
        self.pulses_per_revolution = pulses_per_revolution;
        self
    }

    /// RPM band that triggers the alert. Defaults to `(0, 400)`.
    pub const fn alert_band(&self) -> AlertBand {
        self.alert_band
    }

    /// Set the RPM band that triggers the alert.
    pub const fn with_alert_band(mut self, alert_band: AlertBand) -> Self {
        self.alert_band = alert_band;
        self
    }

    /// Sleep between two samples in ms. Defaults to 1000.
    pub const fn sample_interval_ms(&self) -> u32 {
        self.sample_interval_ms
    }

    /// Set the sleep between two samples in ms.
    pub const fn with_sample_interval_ms(mut self, sample_interval_ms: u32) -> Self {
        self.sample_interval_ms = sample_interval_ms;
        self
    }

    /// Muted pause after every melody tone in ms. Defaults to 50.
    pub const fn inter_note_pause_ms(&self) -> u32 {
        self.inter_note_pause_ms
    }

    /// Set the muted pause after every melody tone in ms.
    pub const fn with_inter_note_pause_ms(mut self, inter_note_pause_ms: u32) -> Self {
        self.inter_note_pause_ms = inter_note_pause_ms;
        self
    }

    /// Tones played when the alert fires. Defaults to
    /// [`ALERT_MELODY`].
    pub const fn melody(&self) -> &'static [ToneValue] {
        self.melody
    }

    /// Set the tones played when the alert fires.
    pub const fn with_melody(mut self, melody: &'static [ToneValue]) -> Self {
        self.melody = melody;
        self
    }

    /// Line rendered on the display when the alert fires.
    pub const fn alert_message(&self) -> &'static str {
        self.alert_message
    }

    /// Set the line rendered on the display when the alert fires.
    pub const fn with_alert_message(mut self, alert_message: &'static str) -> Self {
        self.alert_message = alert_message;
        self
    }

    /// Time in ms the alert message stays on screen before it is cleared.
    /// Defaults to 1000. With 0 the message is cleared right after it is
    /// drawn.
    pub const fn alert_hold_ms(&self) -> u32 {
        self.alert_hold_ms
    }

    /// Set the time in ms the alert message stays on screen.
    pub const fn with_alert_hold_ms(mut self, alert_hold_ms: u32) -> Self {
        self.alert_hold_ms = alert_hold_ms;
        self
    }

    /// Line shown once at startup. Empty to skip it.
    pub const fn startup_banner(&self) -> &'static str {
        self.startup_banner
    }

    /// Set the line shown once at startup.
    pub const fn with_startup_banner(mut self, startup_banner: &'static str) -> Self {
        self.startup_banner = startup_banner;
        self
    }

    /// Check the configuration for values the monitor cannot run with.
    ///
    /// # Errors
    /// Rejects an empty or non-finite alert band, a zero sampling interval
    /// and an alert message that is empty or only whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alert_band.is_valid() {
            return Err(ConfigError::InvalidAlertBand);
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }
        if self.alert_message.trim().is_empty() {
            return Err(ConfigError::EmptyAlertMessage);
        }
        Ok(())
    }
}
