//! # RPM monitor
//!
//! ## Overview
//! Measures the rotational speed of a fan or motor disc from the pulses of an
//! optical or magnetic sensor, and raises an alert through a piezo buzzer and
//! a text display when the speed falls into the alert band.
//!
//! The crate is hardware agnostic. The sensor edge interrupt feeds a
//! [`PulseCounter`], and the [`SamplingLoop`] drains it once per sampling
//! window, turns the count into RPM with an [`RpmEstimator`] and hands the
//! value to an [`AlertSequencer`]. The peripherals are reached through the
//! [`TextDisplay`], [`Buzzer`] and [`Clock`] traits, and blocking waits go
//! through [`embedded_hal::delay::DelayNs`].
//!
//! ## Example
//!
//! ```rust,ignore
//! static PULSES: PulseCounter = PulseCounter::new();
//!
//! // In the GPIO interrupt handler:
//! PULSES.on_edge();
//!
//! // In `main`, after the sensor interrupt is enabled:
//! let monitor = SamplingLoop::new(
//!     Config::default(),
//!     &PULSES,
//!     clock,
//!     display,
//!     buzzer,
//!     Delay::new(),
//! )
//! .unwrap();
//!
//! match monitor.run() {
//!     Ok(never) => match never {},
//!     Err(e) => panic!("monitor stopped: {:?}", e),
//! }
//! ```
//!
//! ## Feature Flags
#![doc = document_features::document_features!()]
#![deny(missing_docs)]
#![no_std]

#[cfg(test)]
extern crate std;

// MUST be the first module
mod fmt;

pub mod alert;
pub mod buzzer;
pub mod clock;
pub mod config;
pub mod display;
pub mod notes;
pub mod pulse_counter;
pub mod rpm;
pub mod sampling;

pub use self::{
    alert::AlertSequencer,
    buzzer::{Buzzer, ToneGenerator, ToneValue},
    clock::Clock,
    config::{AlertBand, Config, ConfigError},
    display::TextDisplay,
    pulse_counter::PulseCounter,
    rpm::{RpmEstimator, SampleWindow},
    sampling::{Sample, SamplingLoop},
};

/// Errors from the monitor
///
/// `D` is the error type of the [`TextDisplay`] and `B` the error type of the
/// [`Buzzer`] in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<D, B> {
    /// The [`Config`] was rejected
    Config(ConfigError),

    /// The display failed to clear or render
    Display(D),

    /// The buzzer failed to change tone
    Buzzer(B),
}

/// Converts [ConfigError] into [self::Error]
impl<D, B> From<ConfigError> for Error<D, B> {
    fn from(error: ConfigError) -> Self {
        Error::Config(error)
    }
}
