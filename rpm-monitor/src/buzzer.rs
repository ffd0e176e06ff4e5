//! # Buzzer
//!
//! ## Overview
//! A [`Buzzer`] is anything that can emit a square wave at a given frequency
//! with a fixed 50% duty, and be muted again. On ESP32 devices this is an
//! LEDC channel driving a piezo-electric buzzer.
//!
//! [`ToneGenerator`] adds timing on top of it: each tone is held for its
//! duration, then the output is muted for a fixed inter-note pause. A tone of
//! 0 Hz is a rest.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut tones = ToneGenerator::new(buzzer, 50);
//!
//! // Play a 1000Hz tone for 200ms, followed by the 50ms pause
//! tones.play_tone(1000, 200, &mut delay).unwrap();
//! ```

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;

/// Tone output capability
pub trait Buzzer {
    /// Error returned when the output cannot be reconfigured
    type Error: Debug;

    /// Start emitting `frequency` Hz at 50% duty until the next call.
    ///
    /// `frequency` is never 0; rests are played with [`Buzzer::mute`].
    fn play(&mut self, frequency: u32) -> Result<(), Self::Error>;

    /// Silence the output.
    fn mute(&mut self) -> Result<(), Self::Error>;
}

impl<T: Buzzer + ?Sized> Buzzer for &mut T {
    type Error = T::Error;

    fn play(&mut self, frequency: u32) -> Result<(), Self::Error> {
        T::play(self, frequency)
    }

    fn mute(&mut self) -> Result<(), Self::Error> {
        T::mute(self)
    }
}

/// Represents a tone value to play through the buzzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneValue {
    /// Frequency of the tone in Hz
    /// *Use 0 for a silent tone*
    pub frequency: u32,

    /// Duration for the frequency in ms
    pub duration: u32,
}

impl ToneValue {
    /// A tone of `frequency` Hz held for `duration` ms.
    pub const fn new(frequency: u32, duration: u32) -> Self {
        Self {
            frequency,
            duration,
        }
    }

    /// A silent tone held for `duration` ms.
    pub const fn rest(duration: u32) -> Self {
        Self::new(0, duration)
    }

    /// Whether this tone is a rest
    pub const fn is_rest(&self) -> bool {
        self.frequency == 0
    }
}

/// Total time in ms that [`ToneGenerator::play_song`] blocks for `tones` with
/// the given inter-note pause.
pub fn song_duration_ms(tones: &[ToneValue], pause_ms: u32) -> u64 {
    tones
        .iter()
        .map(|tone| u64::from(tone.duration) + u64::from(pause_ms))
        .sum()
}

/// Blocking tone sequencer on top of a [`Buzzer`]
#[derive(Debug)]
pub struct ToneGenerator<B> {
    buzzer: B,
    pause_ms: u32,
}

impl<B: Buzzer> ToneGenerator<B> {
    /// Create a tone generator that mutes for `pause_ms` after every tone.
    pub fn new(buzzer: B, pause_ms: u32) -> Self {
        Self { buzzer, pause_ms }
    }

    /// Pause in ms inserted after every tone
    pub fn pause_ms(&self) -> u32 {
        self.pause_ms
    }

    /// Play `frequency` for `duration_ms`, then stay muted for the
    /// inter-note pause.
    ///
    /// Blocks for `duration_ms` plus the pause. A `frequency` of 0 keeps the
    /// output muted for the whole time.
    ///
    /// # Errors
    /// Returns the [`Buzzer`] error if the output could not be changed.
    pub fn play_tone<D: DelayNs>(
        &mut self,
        frequency: u32,
        duration_ms: u32,
        delay: &mut D,
    ) -> Result<(), B::Error> {
        if frequency == 0 {
            self.buzzer.mute()?;
        } else {
            self.buzzer.play(frequency)?;
        }
        delay.delay_ms(duration_ms);

        self.buzzer.mute()?;
        delay.delay_ms(self.pause_ms);

        Ok(())
    }

    /// Play a tone sequence through the buzzer
    ///
    /// Tones are played in order with [`ToneGenerator::play_tone`], and the
    /// output is left muted at the end.
    ///
    /// # Errors
    /// Stops at the first [`Buzzer`] error and returns it.
    pub fn play_song<D: DelayNs>(
        &mut self,
        tones: &[ToneValue],
        delay: &mut D,
    ) -> Result<(), B::Error> {
        for tone in tones {
            self.play_tone(tone.frequency, tone.duration, delay)?;
        }
        // Mute at the end of the sequence
        self.buzzer.mute()
    }

    /// Mute the buzzer
    pub fn mute(&mut self) -> Result<(), B::Error> {
        self.buzzer.mute()
    }

    /// Give back the underlying [`Buzzer`].
    pub fn release(self) -> B {
        self.buzzer
    }
}
