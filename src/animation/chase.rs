use embassy_time::Duration;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{color::Rgbw, error::ValidationError, math8::scaled_millis};

/// Time the pattern needs to move one pixel at speed 1.0
const CHASE_STEP_MS: u64 = 100;

pub const DEFAULT_CHASE_SIZE: u8 = 2;
pub const DEFAULT_CHASE_SPACING: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChaseParams {
    pub color: Rgbw,
    pub speed: f32,
    pub size: u8,
    pub spacing: u8,
    pub reverse: bool,
}

impl Animate for ChaseParams {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        let size = usize::from(self.size);
        let period = size + usize::from(self.spacing);
        if period == 0 {
            return;
        }
        let step = scaled_millis(elapsed, self.speed) / CHASE_STEP_MS;
        let offset = (step % period as u64) as usize;

        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let pos = if self.reverse { len - 1 - i } else { i };
            let phase = (pos + period - offset) % period;
            *led = if phase < size { self.color } else { Rgbw::BLACK };
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)?;
        if self.size == 0 {
            return Err(ValidationError::OutOfRange("size"));
        }
        Ok(())
    }
}
