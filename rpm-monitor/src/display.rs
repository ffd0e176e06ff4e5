//! Text display capability.

use core::fmt::Debug;

/// A monochrome display that renders whole frames of text lines
///
/// Every call redraws the full frame; there are no partial updates.
pub trait TextDisplay {
    /// Error returned when the frame cannot be flushed to the panel
    type Error: Debug;

    /// Blank the frame and flush it.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Draw `lines` top to bottom at a fixed vertical step, then flush.
    fn write_lines(&mut self, lines: &[&str]) -> Result<(), Self::Error>;

    /// Clear the frame, then draw `lines` on it.
    fn show(&mut self, lines: &[&str]) -> Result<(), Self::Error> {
        self.clear()?;
        self.write_lines(lines)
    }
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    type Error = T::Error;

    fn clear(&mut self) -> Result<(), Self::Error> {
        T::clear(self)
    }

    fn write_lines(&mut self, lines: &[&str]) -> Result<(), Self::Error> {
        T::write_lines(self, lines)
    }
}
