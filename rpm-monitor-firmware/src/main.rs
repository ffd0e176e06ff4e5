//! RPM monitor
//!
//! Counts both edges of a pulse sensor, prints the measured RPM once per
//! second and plays an alert on a piezo buzzer (plus a message on an SSD1306
//! display) when the rotor turns slower than 400 RPM.
//!
//! The following wiring is assumed:
//! - Pulse sensor => GPIO16 (internal pull-down)
//! - Piezo buzzer => GPIO21
//! - SSD1306 SDA  => GPIO14
//! - SSD1306 SCL  => GPIO15

#![no_std]
#![no_main]

mod buzzer;
mod display;

use core::cell::RefCell;

use critical_section::Mutex;
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    gpio::{Event, Input, InputConfig, Io, Pull},
    handler,
    i2c::master::{Config as I2cConfig, I2c},
    ledc::{LSGlobalClkSource, Ledc, channel, timer},
    main,
    ram,
    time::{Instant, Rate},
};
use log_04::info;
use rpm_monitor::{Clock, Config, PulseCounter, SamplingLoop};

use self::{buzzer::LedcBuzzer, display::Oled};

esp_bootloader_esp_idf::esp_app_desc!();

static PULSES: PulseCounter = PulseCounter::new();

static SENSOR: Mutex<RefCell<Option<Input<'static>>>> = Mutex::new(RefCell::new(None));

/// Milliseconds since boot from the system timer
struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().duration_since_epoch().as_millis()
    }
}

#[main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());

    let i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )
    .unwrap()
    .with_sda(peripherals.GPIO14)
    .with_scl(peripherals.GPIO15);
    let display = Oled::new(i2c).unwrap();

    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
    let buzzer = LedcBuzzer::new(
        &ledc,
        timer::Number::Timer0,
        channel::Number::Channel0,
        peripherals.GPIO21,
    )
    .unwrap();

    let mut io = Io::new(peripherals.IO_MUX);
    io.set_interrupt_handler(sensor_edge);

    let mut sensor = Input::new(
        peripherals.GPIO16,
        InputConfig::default().with_pull(Pull::Down),
    );
    critical_section::with(|cs| {
        sensor.listen(Event::AnyEdge);
        SENSOR.borrow_ref_mut(cs).replace(sensor);
    });
    info!("Listening for sensor edges on GPIO16");

    // The first window starts here, with the sensor interrupt already live
    let monitor = SamplingLoop::new(
        Config::default(),
        &PULSES,
        SystemClock,
        display,
        buzzer,
        Delay::new(),
    )
    .unwrap();

    match monitor.run() {
        Ok(never) => match never {},
        Err(e) => panic!("RPM monitor stopped: {:?}", e),
    }
}

#[handler]
#[ram]
fn sensor_edge() {
    critical_section::with(|cs| {
        let mut sensor = SENSOR.borrow_ref_mut(cs);
        let Some(sensor) = sensor.as_mut() else {
            return;
        };

        if sensor.is_interrupt_set() {
            PULSES.on_edge();
            sensor.clear_interrupt();
        }
    });
}
