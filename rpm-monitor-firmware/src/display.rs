//! SSD1306 128x64 OLED rendering text lines.

use display_interface::DisplayError;
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306::{
    I2CDisplayInterface,
    Ssd1306,
    mode::BufferedGraphicsMode,
    prelude::*,
    size::DisplaySize128x64,
};

/// Left margin of every line in px
const MARGIN_X: i32 = 5;

/// Vertical distance between two lines in px
const LINE_STEP: i32 = 8;

type Panel<I> = Ssd1306<I2CInterface<I>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Text frame renderer on an I2C SSD1306
pub struct Oled<I> {
    panel: Panel<I>,
}

impl<I: embedded_hal::i2c::I2c> Oled<I> {
    /// Initialise the panel and blank it.
    pub fn new(i2c: I) -> Result<Self, DisplayError> {
        let mut panel = Ssd1306::new(
            I2CDisplayInterface::new(i2c),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();
        panel.init()?;

        let mut oled = Self { panel };
        rpm_monitor::TextDisplay::clear(&mut oled)?;

        Ok(oled)
    }
}

impl<I: embedded_hal::i2c::I2c> rpm_monitor::TextDisplay for Oled<I> {
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.panel.clear_buffer();
        self.panel.flush()
    }

    fn write_lines(&mut self, lines: &[&str]) -> Result<(), Self::Error> {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        let mut y = 0;
        for line in lines {
            Text::with_baseline(line, Point::new(MARGIN_X, y), style, Baseline::Top)
                .draw(&mut self.panel)?;
            y += LINE_STEP;
        }

        self.panel.flush()
    }
}
