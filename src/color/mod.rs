mod hex;
mod order;

pub use hex::{HexColor, parse_hex};
pub use order::ColorOrder;
use serde::{Serialize, Serializer};
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use smart_leds::hsv::hsv2rgb;

use crate::math8::scale8;

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Pixel color with an optional white channel
///
/// Strips without a white LED ignore `w` when the frame is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    pub const BLACK: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0)
    }

    /// Color channels without white
    pub const fn rgb(self) -> Rgb {
        Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Scale every channel by `scale` (0-255 = 0.0-1.0)
    #[must_use]
    pub const fn scale(self, scale: u8) -> Self {
        Self {
            r: scale8(self.r, scale),
            g: scale8(self.g, scale),
            b: scale8(self.b, scale),
            w: scale8(self.w, scale),
        }
    }
}

impl From<Rgb> for Rgbw {
    fn from(color: Rgb) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }
}

impl Serialize for Rgbw {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(HexColor::from(*self).as_str())
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgbw {
    Rgbw::from_rgb(
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// Fill the slice with one color
pub fn fill(leds: &mut [Rgbw], color: Rgbw) {
    for led in leds {
        *led = color;
    }
}
