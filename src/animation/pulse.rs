use core::f32::consts::TAU;

use embassy_time::Duration;
use serde::Serialize;

use super::{Animate, validate_speed};
use crate::{
    color::{Rgbw, fill},
    error::ValidationError,
    math8::{scaled_millis, unit_to_u8},
};

/// One full dark-bright-dark breath at speed 1.0
const PULSE_PERIOD_MS: u64 = 2_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseParams {
    pub color: Rgbw,
    pub speed: f32,
}

impl Animate for PulseParams {
    #[allow(clippy::cast_precision_loss)]
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]) {
        let progress = scaled_millis(elapsed, self.speed) % PULSE_PERIOD_MS;
        let phase = progress as f32 / PULSE_PERIOD_MS as f32;
        // Raised cosine: starts dark, peaks halfway through the period
        let level = (1.0 - libm::cosf(TAU * phase)) / 2.0;
        fill(leds, self.color.scale(unit_to_u8(level)));
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_speed(self.speed)
    }
}
