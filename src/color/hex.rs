use core::fmt::Write as _;

use heapless::String;

use super::{Rgbw, rgb_from_u32};

/// Formatted `#rrggbb` or `#rrggbbww` color
pub struct HexColor(String<9>);

impl HexColor {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Rgbw> for HexColor {
    fn from(color: Rgbw) -> Self {
        let mut out = String::new();
        // Capacity fits the longest form, so formatting cannot fail.
        let _ = write!(out, "#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
        if color.w != 0 {
            let _ = write!(out, "{:02x}", color.w);
        }
        Self(out)
    }
}

/// Parse a hex color string
///
/// Accepts `#rrggbb`, `0xrrggbb` and the same forms with a trailing white
/// byte (`#rrggbbww`).
pub fn parse_hex(s: &str) -> Option<Rgbw> {
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => {
            let value = u32::from_str_radix(digits, 16).ok()?;
            Some(rgb_from_u32(value))
        }
        8 => {
            let value = u32::from_str_radix(digits, 16).ok()?;
            let mut color = rgb_from_u32(value >> 8);
            color.w = (value & 0xFF) as u8;
            Some(color)
        }
        _ => None,
    }
}
