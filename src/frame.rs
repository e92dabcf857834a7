use crate::color::{ColorOrder, Rgbw};

/// One rendered frame, borrowed from the renderer's pixel buffer
///
/// Pixels are stored in logical RGB(W) order; [`Frame::wire_bytes`] applies
/// the hardware channel layout.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pixels: &'a [Rgbw],
    order: ColorOrder,
}

impl<'a> Frame<'a> {
    pub const fn new(pixels: &'a [Rgbw], order: ColorOrder) -> Self {
        Self { pixels, order }
    }

    pub const fn pixels(&self) -> &'a [Rgbw] {
        self.pixels
    }

    pub const fn color_order(&self) -> ColorOrder {
        self.order
    }

    pub const fn len(&self) -> usize {
        self.pixels.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Number of bytes [`Frame::wire_bytes`] yields
    pub const fn wire_len(&self) -> usize {
        self.pixels.len() * self.order.bytes_per_pixel()
    }

    /// Frame bytes in the strip's channel order
    pub fn wire_bytes(&self) -> impl Iterator<Item = u8> + 'a {
        let order = self.order;
        self.pixels.iter().flat_map(move |px| {
            let (bytes, used) = order.encode(*px);
            bytes.into_iter().take(used)
        })
    }
}
