use embassy_time::Duration;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{
    color::{Rgbw, fill},
    error::ValidationError,
    math8::scaled_millis,
};

/// Duration of one on or off phase at speed 1.0
const BLINK_STEP_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlinkParams {
    pub color: Rgbw,
    pub speed: f32,
}

impl Animate for BlinkParams {
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        let step = scaled_millis(elapsed, self.speed) / BLINK_STEP_MS;
        let color = if step.is_multiple_of(2) {
            self.color
        } else {
            Rgbw::BLACK
        };
        fill(leds, color);
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)
    }
}
