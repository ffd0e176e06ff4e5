//! # Alert sequencer
//!
//! ## Overview
//! Decides, for one RPM reading, whether the rotor is in the alert band and
//! if so runs the alert action:
//!
//! 1. play the melody to completion on the buzzer,
//! 2. clear the display,
//! 3. draw the alert message,
//! 4. keep it on screen for the configured hold time,
//! 5. clear the display again.
//!
//! The whole action blocks the caller. Pulses keep being counted by the
//! interrupt handler in the meantime and show up in the next window.
//!
//! Readings outside the band leave the display and buzzer untouched. There is
//! no latch: every reading is evaluated on its own.

use embedded_hal::delay::DelayNs;

use crate::{AlertBand, Buzzer, Config, Error, TextDisplay, ToneGenerator, ToneValue};

/// Drives the buzzer and the display when the RPM enters the alert band
#[derive(Debug)]
pub struct AlertSequencer<D, B> {
    display: D,
    tones: ToneGenerator<B>,
    band: AlertBand,
    melody: &'static [ToneValue],
    message: &'static str,
    hold_ms: u32,
}

impl<D, B> AlertSequencer<D, B>
where
    D: TextDisplay,
    B: Buzzer,
{
    /// Create a sequencer using the band, melody and message from `config`.
    pub fn new(display: D, buzzer: B, config: &Config) -> Self {
        Self {
            display,
            tones: ToneGenerator::new(buzzer, config.inter_note_pause_ms()),
            band: config.alert_band(),
            melody: config.melody(),
            message: config.alert_message(),
            hold_ms: config.alert_hold_ms(),
        }
    }

    /// Run the alert action if `rpm` is inside the alert band.
    ///
    /// Returns whether the action ran.
    ///
    /// # Errors
    /// Returns the first display or buzzer error. The next reading is
    /// evaluated afresh either way.
    pub fn evaluate<P: DelayNs>(
        &mut self,
        rpm: f32,
        delay: &mut P,
    ) -> Result<bool, Error<D::Error, B::Error>> {
        if !self.band.contains(rpm) {
            return Ok(false);
        }

        warn!("RPM {} inside alert band, alerting", rpm);
        self.alert(delay)?;
        debug!("Alert finished");

        Ok(true)
    }

    fn alert<P: DelayNs>(&mut self, delay: &mut P) -> Result<(), Error<D::Error, B::Error>> {
        self.tones
            .play_song(self.melody, delay)
            .map_err(Error::Buzzer)?;

        self.display.clear().map_err(Error::Display)?;
        self.display
            .write_lines(&[self.message])
            .map_err(Error::Display)?;
        if self.hold_ms > 0 {
            delay.delay_ms(self.hold_ms);
        }
        self.display.clear().map_err(Error::Display)
    }

    /// Replace the frame with `lines`, outside of any alert.
    pub fn show(&mut self, lines: &[&str]) -> Result<(), D::Error> {
        self.display.show(lines)
    }

    /// Give back the display and the buzzer.
    pub fn release(self) -> (D, B) {
        (self.display, self.tones.release())
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use std::{rc::Rc, string::String, vec, vec::Vec};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Tone(u32),
        Mute,
        Wait(u32),
        Clear,
        Write(Vec<String>),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct Screen(Log);

    impl TextDisplay for Screen {
        type Error = ();

        fn clear(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().push(Event::Clear);
            Ok(())
        }

        fn write_lines(&mut self, lines: &[&str]) -> Result<(), ()> {
            let lines = lines.iter().map(|l| String::from(*l)).collect();
            self.0.borrow_mut().push(Event::Write(lines));
            Ok(())
        }
    }

    struct Piezo(Log);

    impl Buzzer for Piezo {
        type Error = ();

        fn play(&mut self, frequency: u32) -> Result<(), ()> {
            self.0.borrow_mut().push(Event::Tone(frequency));
            Ok(())
        }

        fn mute(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().push(Event::Mute);
            Ok(())
        }
    }

    struct Wait(Log);

    impl DelayNs for Wait {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Wait(ms));
        }
    }

    static TWO_TONES: [ToneValue; 2] = [ToneValue::new(440, 100), ToneValue::new(880, 200)];

    fn sequencer(config: &Config) -> (AlertSequencer<Screen, Piezo>, Wait, Log) {
        let log = Log::default();
        let sequencer = AlertSequencer::new(Screen(log.clone()), Piezo(log.clone()), config);
        (sequencer, Wait(log.clone()), log)
    }

    #[test]
    fn alert_plays_melody_then_flashes_message() {
        let config = Config::default()
            .with_melody(&TWO_TONES)
            .with_alert_message("SLOW")
            .with_alert_hold_ms(500);
        let (mut alert, mut delay, log) = sequencer(&config);

        assert_eq!(alert.evaluate(300.0, &mut delay), Ok(true));

        assert_eq!(
            *log.borrow(),
            [
                Event::Tone(440),
                Event::Wait(100),
                Event::Mute,
                Event::Wait(50),
                Event::Tone(880),
                Event::Wait(200),
                Event::Mute,
                Event::Wait(50),
                Event::Mute,
                Event::Clear,
                Event::Write(vec![String::from("SLOW")]),
                Event::Wait(500),
                Event::Clear,
            ]
        );
    }

    #[test]
    fn zero_hold_clears_right_after_writing() {
        let config = Config::default()
            .with_melody(&[])
            .with_alert_hold_ms(0);
        let (mut alert, mut delay, log) = sequencer(&config);

        assert_eq!(alert.evaluate(1.0, &mut delay), Ok(true));

        assert_eq!(
            *log.borrow(),
            [
                Event::Mute,
                Event::Clear,
                Event::Write(vec![String::from(config.alert_message())]),
                Event::Clear,
            ]
        );
    }

    #[test]
    fn outside_band_touches_nothing() {
        let (mut alert, mut delay, log) = sequencer(&Config::default());

        for rpm in [0.0, 400.0, 400.5, 3600.0, -5.0, f32::NAN] {
            assert_eq!(alert.evaluate(rpm, &mut delay), Ok(false));
        }

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn every_reading_inside_band_alerts_again() {
        let config = Config::default().with_melody(&[]).with_alert_hold_ms(0);
        let (mut alert, mut delay, log) = sequencer(&config);

        assert_eq!(alert.evaluate(120.0, &mut delay), Ok(true));
        assert_eq!(alert.evaluate(3600.0, &mut delay), Ok(false));
        assert_eq!(alert.evaluate(399.0, &mut delay), Ok(true));

        let writes = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Write(_)))
            .count();
        assert_eq!(writes, 2);
    }

    #[test]
    fn buzzer_error_is_reported_before_touching_display() {
        struct Broken;

        impl Buzzer for Broken {
            type Error = &'static str;

            fn play(&mut self, _frequency: u32) -> Result<(), Self::Error> {
                Err("ledc")
            }

            fn mute(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let log = Log::default();
        let mut alert = AlertSequencer::new(Screen(log.clone()), Broken, &Config::default());
        let mut delay = Wait(log.clone());

        assert_eq!(
            alert.evaluate(200.0, &mut delay),
            Err(Error::Buzzer("ledc"))
        );
        assert!(!log.borrow().contains(&Event::Clear));
    }

    #[test]
    fn show_replaces_frame() {
        let (mut alert, _delay, log) = sequencer(&Config::default());

        alert.show(&["RPM monitor"]).unwrap();

        assert_eq!(
            *log.borrow(),
            [Event::Clear, Event::Write(vec![String::from("RPM monitor")])]
        );
    }
}
