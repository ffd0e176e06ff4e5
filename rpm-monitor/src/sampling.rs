//! # Sampling loop
//!
//! ## Overview
//! The foreground control loop of the monitor. Every iteration:
//!
//! 1. reads the clock and computes the time since the previous iteration,
//! 2. drains the [`PulseCounter`],
//! 3. converts the window into RPM,
//! 4. logs the `(pulses, elapsed, rpm)` status line,
//! 5. hands the RPM to the [`AlertSequencer`],
//! 6. sleeps for the sample interval.
//!
//! The steps run strictly in that order. The loop never exits on its own; it
//! only returns when a peripheral fails.
//!
//! Create the loop only after the sensor interrupt is enabled: the first
//! window starts when [`SamplingLoop::new`] reads the clock, and edges counted
//! before that are discarded.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::{
    AlertSequencer,
    Buzzer,
    Clock,
    Config,
    Error,
    PulseCounter,
    RpmEstimator,
    SampleWindow,
    TextDisplay,
};

/// The outcome of one sampling iteration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// The drained window
    pub window: SampleWindow,

    /// Estimated speed over the window
    pub rpm: f32,

    /// Whether the alert action ran for this sample
    pub alerted: bool,
}

/// The status line logged once per iteration
impl core::fmt::Display for Sample {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Pulses: {} | Elapsed: {} ms | RPM: {:.2}",
            self.window.pulses, self.window.elapsed_ms, self.rpm
        )
    }
}

/// The monitor's control loop
pub struct SamplingLoop<'a, C, D, B, P> {
    counter: &'a PulseCounter,
    clock: C,
    delay: P,
    estimator: RpmEstimator,
    alert: AlertSequencer<D, B>,
    interval_ms: u32,
    last_ms: u64,
}

impl<'a, C, D, B, P> SamplingLoop<'a, C, D, B, P>
where
    C: Clock,
    D: TextDisplay,
    B: Buzzer,
    P: DelayNs,
{
    /// Set up the loop.
    ///
    /// Validates `config`, shows the startup banner, drops any edges counted
    /// so far and starts the first window.
    ///
    /// # Errors
    /// Fails on an invalid [`Config`] or when the banner cannot be drawn.
    pub fn new(
        config: Config,
        counter: &'a PulseCounter,
        clock: C,
        display: D,
        buzzer: B,
        delay: P,
    ) -> Result<Self, Error<D::Error, B::Error>> {
        config.validate()?;

        let mut alert = AlertSequencer::new(display, buzzer, &config);
        if !config.startup_banner().is_empty() {
            alert
                .show(&[config.startup_banner()])
                .map_err(Error::Display)?;
        }

        info!("RPM counting started");

        let discarded = counter.take_and_reset();
        if discarded > 0 {
            debug!("Discarding {} pulses counted before start", discarded);
        }
        let last_ms = clock.now_ms();

        Ok(Self {
            counter,
            clock,
            delay,
            estimator: RpmEstimator::new(config.pulses_per_revolution()),
            alert,
            interval_ms: config.sample_interval_ms(),
            last_ms,
        })
    }

    /// Run one iteration without the trailing sleep.
    ///
    /// # Errors
    /// Returns the display or buzzer error raised by the alert action.
    pub fn step(&mut self) -> Result<Sample, Error<D::Error, B::Error>> {
        let now = self.clock.now_ms();
        // A clock that went backwards yields an empty window, i.e. 0 RPM.
        let elapsed_ms = now.saturating_sub(self.last_ms);
        self.last_ms = now;

        let window = SampleWindow {
            pulses: self.counter.take_and_reset(),
            elapsed_ms,
        };
        let mut sample = Sample {
            window,
            rpm: self.estimator.estimate_window(window),
            alerted: false,
        };
        info!("{}", sample);

        sample.alerted = self.alert.evaluate(sample.rpm, &mut self.delay)?;

        Ok(sample)
    }

    /// Sample forever, sleeping for the configured interval between
    /// iterations.
    ///
    /// # Errors
    /// Only returns when a peripheral fails.
    pub fn run(mut self) -> Result<Infallible, Error<D::Error, B::Error>> {
        loop {
            if let Err(e) = self.step() {
                error!("Sampling stopped: peripheral failure");
                return Err(e);
            }
            self.delay.delay_ms(self.interval_ms);
        }
    }

    /// Tear the loop down, giving back the peripherals.
    pub fn release(self) -> (C, D, B, P) {
        let (display, buzzer) = self.alert.release();
        (self.clock, display, buzzer, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use std::{format, string::String, vec::Vec};

    use super::*;

    struct FakeClock<'c>(&'c Cell<u64>);

    impl Clock for FakeClock<'_> {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct Frames(Vec<String>);

    impl TextDisplay for Frames {
        type Error = ();

        fn clear(&mut self) -> Result<(), ()> {
            self.0.push(String::from("<clear>"));
            Ok(())
        }

        fn write_lines(&mut self, lines: &[&str]) -> Result<(), ()> {
            self.0.extend(lines.iter().map(|l| String::from(*l)));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Tones(Vec<u32>);

    impl Buzzer for Tones {
        type Error = ();

        fn play(&mut self, frequency: u32) -> Result<(), ()> {
            self.0.push(frequency);
            Ok(())
        }

        fn mute(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn new_shows_banner_and_drops_early_pulses() {
        let now = Cell::new(42);
        let counter = PulseCounter::new();
        counter.on_edge();
        counter.on_edge();

        let monitor = SamplingLoop::new(
            Config::default().with_startup_banner("hello"),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        assert_eq!(counter.take_and_reset(), 0);
        let (_, frames, _, _) = monitor.release();
        assert_eq!(frames.0, ["<clear>", "hello"]);
    }

    #[test]
    fn empty_banner_leaves_display_alone() {
        let now = Cell::new(0);
        let counter = PulseCounter::new();

        let monitor = SamplingLoop::new(
            Config::default().with_startup_banner(""),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        let (_, frames, _, _) = monitor.release();
        assert!(frames.0.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let now = Cell::new(0);
        let counter = PulseCounter::new();

        let result = SamplingLoop::new(
            Config::default().with_sample_interval_ms(0),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        );

        assert!(matches!(
            result,
            Err(Error::Config(crate::ConfigError::ZeroSampleInterval))
        ));
    }

    #[test]
    fn step_measures_time_since_previous_step() {
        let now = Cell::new(1_000);
        let counter = PulseCounter::new();
        let mut monitor = SamplingLoop::new(
            Config::default(),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        for _ in 0..60 {
            counter.on_edge();
        }
        now.set(2_000);
        let sample = monitor.step().unwrap();
        assert_eq!(sample.window.pulses, 60);
        assert_eq!(sample.window.elapsed_ms, 1_000);
        assert_eq!(sample.rpm, 3600.0);
        assert!(!sample.alerted);

        for _ in 0..30 {
            counter.on_edge();
        }
        now.set(4_000);
        let sample = monitor.step().unwrap();
        assert_eq!(sample.window.elapsed_ms, 2_000);
        assert_eq!(sample.rpm, 900.0);
    }

    #[test]
    fn clock_going_backwards_gives_zero_rpm() {
        let now = Cell::new(5_000);
        let counter = PulseCounter::new();
        let mut monitor = SamplingLoop::new(
            Config::default(),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        counter.on_edge();
        now.set(4_000);
        let sample = monitor.step().unwrap();

        assert_eq!(sample.window.elapsed_ms, 0);
        assert_eq!(sample.rpm, 0.0);
        assert!(!sample.alerted);
    }

    #[test]
    fn slow_rotor_alerts() {
        let now = Cell::new(0);
        let counter = PulseCounter::new();
        let mut monitor = SamplingLoop::new(
            Config::default().with_startup_banner(""),
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        for _ in 0..5 {
            counter.on_edge();
        }
        now.set(1_000);
        let sample = monitor.step().unwrap();

        assert_eq!(sample.rpm, 300.0);
        assert!(sample.alerted);
        let (_, frames, tones, _) = monitor.release();
        assert_eq!(tones.0, [784, 880, 988, 880, 784]);
        assert_eq!(frames.0, ["<clear>", "    Alert!    ", "<clear>"]);
    }

    #[test]
    fn step_reports_status_line_with_two_decimals() {
        let now = Cell::new(0);
        let counter = PulseCounter::new();
        let config = Config::default()
            .with_pulses_per_revolution(core::num::NonZeroU32::new(3).unwrap());
        let mut monitor = SamplingLoop::new(
            config,
            &counter,
            FakeClock(&now),
            Frames::default(),
            Tones::default(),
            NoDelay,
        )
        .unwrap();

        for _ in 0..100 {
            counter.on_edge();
        }
        now.set(1_000);
        let sample = monitor.step().unwrap();

        assert_eq!(
            format!("{sample}"),
            "Pulses: 100 | Elapsed: 1000 ms | RPM: 2000.00"
        );
    }

    #[test]
    fn status_line_format() {
        let sample = Sample {
            window: SampleWindow {
                pulses: 5,
                elapsed_ms: 1000,
            },
            rpm: 300.0,
            alerted: true,
        };

        assert_eq!(
            format!("{sample}"),
            "Pulses: 5 | Elapsed: 1000 ms | RPM: 300.00"
        );
    }
}
