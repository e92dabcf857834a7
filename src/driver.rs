//! Adapter for `smart-leds` compatible strip drivers

use smart_leds::SmartLedsWrite;

use crate::color::Rgb;
use crate::error::DriverError;
use crate::frame::Frame;
use crate::OutputDriver;

/// Wraps any [`SmartLedsWrite`] driver as an [`OutputDriver`]
///
/// `smart-leds` drivers take logical RGB and handle the wire order
/// themselves, so the frame's color order and white channel are not used.
pub struct SmartLedsOutput<W> {
    writer: W,
}

impl<W> SmartLedsOutput<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    fn write(&mut self, frame: &Frame<'_>) -> Result<(), DriverError> {
        self.writer
            .write(frame.pixels().iter().map(|px| px.rgb()))
            .map_err(|_| DriverError::WriteFault)
    }
}
