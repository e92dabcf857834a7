use embassy_time::Duration;
use serde::Serialize;

use super::Animate;
use crate::color::{Rgbw, fill};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolidParams {
    pub color: Rgbw,
}

impl Animate for SolidParams {
    fn render(&self, _elapsed: Duration, leds: &mut [Rgbw]) {
        fill(leds, self.color);
    }
}
