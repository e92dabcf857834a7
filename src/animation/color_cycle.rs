use embassy_time::Duration;
use heapless::Vec;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{
    color::{Rgbw, fill},
    error::ValidationError,
    math8::scaled_millis,
};

/// Maximum number of colors in one cycle
pub const MAX_CYCLE_COLORS: usize = 8;

/// Time each color is shown at speed 1.0
const COLOR_CYCLE_STEP_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCycleParams {
    pub colors: Vec<Rgbw, MAX_CYCLE_COLORS>,
    pub speed: f32,
}

impl Animate for ColorCycleParams {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        if self.colors.is_empty() {
            fill(leds, Rgbw::BLACK);
            return;
        }
        let step = scaled_millis(elapsed, self.speed) / COLOR_CYCLE_STEP_MS;
        let index = (step % self.colors.len() as u64) as usize;
        fill(leds, self.colors[index]);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)?;
        if self.colors.is_empty() {
            return Err(ValidationError::MissingField("colors"));
        }
        Ok(())
    }
}
