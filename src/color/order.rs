use serde::{Serialize, Serializer};

use super::Rgbw;

const ORDER_NAME_RGB: &str = "RGB";
const ORDER_NAME_RBG: &str = "RBG";
const ORDER_NAME_GRB: &str = "GRB";
const ORDER_NAME_GBR: &str = "GBR";
const ORDER_NAME_BRG: &str = "BRG";
const ORDER_NAME_BGR: &str = "BGR";
const ORDER_NAME_RGBW: &str = "RGBW";
const ORDER_NAME_GRBW: &str = "GRBW";

/// Channel layout of the strip hardware
///
/// Neopixels are usually `Grb`, Dotstars `Bgr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOrder {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
    Rgbw,
    Grbw,
}

impl ColorOrder {
    /// Number of bytes each pixel occupies on the wire
    pub const fn bytes_per_pixel(self) -> usize {
        if self.has_white() { 4 } else { 3 }
    }

    pub const fn has_white(self) -> bool {
        matches!(self, Self::Rgbw | Self::Grbw)
    }

    /// Encode one pixel into wire order
    ///
    /// Returns the bytes and how many of them are used.
    pub const fn encode(self, px: Rgbw) -> ([u8; 4], usize) {
        let bytes = match self {
            Self::Rgb => [px.r, px.g, px.b, 0],
            Self::Rbg => [px.r, px.b, px.g, 0],
            Self::Grb => [px.g, px.r, px.b, 0],
            Self::Gbr => [px.g, px.b, px.r, 0],
            Self::Brg => [px.b, px.r, px.g, 0],
            Self::Bgr => [px.b, px.g, px.r, 0],
            Self::Rgbw => [px.r, px.g, px.b, px.w],
            Self::Grbw => [px.g, px.r, px.b, px.w],
        };
        (bytes, self.bytes_per_pixel())
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => ORDER_NAME_RGB,
            Self::Rbg => ORDER_NAME_RBG,
            Self::Grb => ORDER_NAME_GRB,
            Self::Gbr => ORDER_NAME_GBR,
            Self::Brg => ORDER_NAME_BRG,
            Self::Bgr => ORDER_NAME_BGR,
            Self::Rgbw => ORDER_NAME_RGBW,
            Self::Grbw => ORDER_NAME_GRBW,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ORDER_NAME_RGB => Some(Self::Rgb),
            ORDER_NAME_RBG => Some(Self::Rbg),
            ORDER_NAME_GRB => Some(Self::Grb),
            ORDER_NAME_GBR => Some(Self::Gbr),
            ORDER_NAME_BRG => Some(Self::Brg),
            ORDER_NAME_BGR => Some(Self::Bgr),
            ORDER_NAME_RGBW => Some(Self::Rgbw),
            ORDER_NAME_GRBW => Some(Self::Grbw),
            _ => None,
        }
    }
}

impl Serialize for ColorOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
