//! Piezo buzzer on a low-speed LEDC channel.

use esp_hal::{
    gpio::{AnyPin, DriveMode, OutputPin, Pin},
    ledc::{
        Ledc,
        LowSpeed,
        channel::{self, ChannelIFace},
        timer::{self, Timer, TimerIFace},
    },
    time::Rate,
};

/// APB clock feeding the LEDC timers
const APB_CLOCK_HZ: u32 = 80_000_000;

/// Errors from the LEDC buzzer
#[derive(Debug)]
pub enum Error {
    /// Errors from [channel::Error]
    Channel(channel::Error),

    /// Errors from [timer::Error]
    Timer(timer::Error),

    /// No duty resolution fits the requested frequency
    Resolution(u32),
}

/// Converts [channel::Error] into [self::Error]
impl From<channel::Error> for Error {
    fn from(error: channel::Error) -> Self {
        Error::Channel(error)
    }
}

/// Converts [timer::Error] into [self::Error]
impl From<timer::Error> for Error {
    fn from(error: timer::Error) -> Self {
        Error::Timer(error)
    }
}

/// A buzzer driven by one LEDC timer and channel at 50% duty
pub struct LedcBuzzer<'d> {
    ledc: &'d Ledc<'d>,
    timer: Timer<'d, LowSpeed>,
    channel_number: channel::Number,
    output_pin: AnyPin<'d>,
}

impl<'d> LedcBuzzer<'d> {
    /// Create a muted buzzer on `output_pin`.
    pub fn new(
        ledc: &'d Ledc<'d>,
        timer_number: timer::Number,
        channel_number: channel::Number,
        output_pin: impl OutputPin + 'd,
    ) -> Result<Self, Error> {
        let mut buzzer = Self {
            ledc,
            timer: ledc.timer(timer_number),
            channel_number,
            output_pin: output_pin.degrade(),
        };

        // The channel needs a configured timer even to hold the output low
        buzzer.configure_timer(1_000)?;
        buzzer.set_duty(0)?;

        Ok(buzzer)
    }

    fn configure_timer(&mut self, frequency: u32) -> Result<(), Error> {
        // Max duty resolution for a frequency:
        // Integer(log2(LEDC_APB_CKL / frequency))
        let mut result = 0;
        let mut value = APB_CLOCK_HZ / frequency;

        // Limit duty resolution to 14 bits
        while value > 1 && result < 14 {
            value >>= 1;
            result += 1;
        }

        let duty =
            timer::config::Duty::try_from(result).map_err(|_| Error::Resolution(frequency))?;

        self.timer.configure(timer::config::Config {
            duty,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_hz(frequency),
        })?;

        Ok(())
    }

    fn set_duty(&mut self, duty_pct: u8) -> Result<(), Error> {
        let mut channel = self
            .ledc
            .channel(self.channel_number, self.output_pin.reborrow());
        channel.configure(channel::config::Config {
            timer: &self.timer,
            duty_pct,
            drive_mode: DriveMode::PushPull,
        })?;

        Ok(())
    }
}

impl rpm_monitor::Buzzer for LedcBuzzer<'_> {
    type Error = Error;

    fn play(&mut self, frequency: u32) -> Result<(), Self::Error> {
        self.configure_timer(frequency)?;
        self.set_duty(50)
    }

    fn mute(&mut self) -> Result<(), Self::Error> {
        self.set_duty(0)
    }
}
