//! Note frequencies and the default alert melody.

#![allow(missing_docs)]

use crate::ToneValue;

// Note values in Hz
pub const NOTE_G5: u32 = 784;
pub const NOTE_A5: u32 = 880;
pub const NOTE_B5: u32 = 988;
pub const REST: u32 = 0;

/// The rising and falling five-note cue played when the speed drops into the
/// alert band
pub const ALERT_MELODY: [ToneValue; 5] = [
    ToneValue::new(NOTE_G5, 150),
    ToneValue::new(NOTE_A5, 150),
    ToneValue::new(NOTE_B5, 200),
    ToneValue::new(NOTE_A5, 150),
    ToneValue::new(NOTE_G5, 300),
];
