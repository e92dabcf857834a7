//! Rotating hue wheel spread over the whole strip

use embassy_time::Duration;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{
    color::{Hsv, Rgbw, hsv2rgb},
    error::ValidationError,
    math8::scaled_millis,
};

/// Duration of one complete hue rotation at speed 1.0
const RAINBOW_PERIOD_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainbowParams {
    pub speed: f32,
}

impl Animate for RainbowParams {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        if leds.is_empty() {
            return;
        }

        let progress = scaled_millis(elapsed, self.speed) % RAINBOW_PERIOD_MS;
        let base_hue = ((progress * 256) / RAINBOW_PERIOD_MS) as u8;

        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            // i < len, so the offset stays below 256
            let offset = ((i * 256) / len) as u8;
            *led = hsv2rgb(Hsv {
                hue: base_hue.wrapping_add(offset),
                sat: 255,
                val: 255,
            })
            .into();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)
    }
}
