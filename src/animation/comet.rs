//! Comet: a bright head with a linearly fading tail
//!
//! The head enters at the first pixel and travels until the tail has left
//! the strip. With `bounce` it travels back instead of wrapping around.

use embassy_time::Duration;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{
    color::{Rgbw, fill},
    error::ValidationError,
    math8::scaled_millis,
};

/// Time the head needs to move one pixel at speed 1.0
const COMET_STEP_MS: u64 = 50;

pub const DEFAULT_TAIL_LENGTH: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CometParams {
    pub color: Rgbw,
    pub speed: f32,
    pub tail_length: u8,
    pub bounce: bool,
    pub reverse: bool,
}

impl CometParams {
    /// Head position and whether the head is on its way back
    fn head(&self, step: u64, travel: u64) -> (u64, bool) {
        if !self.bounce {
            return (step % travel, false);
        }
        let cycle = travel * 2;
        let pos = step % cycle;
        if pos < travel {
            (pos, false)
        } else {
            (cycle - 1 - pos, true)
        }
    }
}

impl Animate for CometParams {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        fill(leds, Rgbw::BLACK);
        let len = leds.len();
        if len == 0 {
            return;
        }

        let tail = usize::from(self.tail_length.max(1));
        let travel = (len + tail) as u64;
        let step = scaled_millis(elapsed, self.speed) / COMET_STEP_MS;
        let (head, backwards) = self.head(step, travel);
        let head = head as usize;

        for k in 0..tail {
            let index = if backwards {
                head.checked_add(k)
            } else {
                head.checked_sub(k)
            };
            let Some(index) = index.filter(|&i| i < len) else {
                continue;
            };
            let level = (255 - (k * 255) / tail) as u8;
            let pos = if self.reverse { len - 1 - index } else { index };
            leds[pos] = self.color.scale(level);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)?;
        if self.tail_length == 0 {
            return Err(ValidationError::OutOfRange("tail_length"));
        }
        Ok(())
    }
}
