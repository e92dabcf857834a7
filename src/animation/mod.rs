//! Animation catalogue as a closed set of variants
//!
//! Every animation is a pure function of elapsed time and its parameters,
//! so switching animations or restarting the timer always starts from the
//! same first frame. Adding an animation means adding a variant here; the
//! renderer matches on it exhaustively.

mod blink;
mod chase;
mod color_cycle;
mod comet;
mod pulse;
mod rainbow;
mod solid;

pub use blink::BlinkParams;
pub use chase::{ChaseParams, DEFAULT_CHASE_SIZE, DEFAULT_CHASE_SPACING};
pub use color_cycle::{ColorCycleParams, MAX_CYCLE_COLORS};
pub use comet::{CometParams, DEFAULT_TAIL_LENGTH};
use embassy_time::Duration;
pub use pulse::PulseParams;
pub use rainbow::RainbowParams;
use serde::Serialize;
pub use solid::SolidParams;

use crate::{
    color::{Rgbw, fill},
    error::ValidationError,
};

pub const ANIMATION_NAME_OFF: &str = "off";
pub const ANIMATION_NAME_SOLID: &str = "solid";
pub const ANIMATION_NAME_BLINK: &str = "blink";
pub const ANIMATION_NAME_PULSE: &str = "pulse";
pub const ANIMATION_NAME_RAINBOW: &str = "rainbow";
pub const ANIMATION_NAME_COMET: &str = "comet";
pub const ANIMATION_NAME_CHASE: &str = "chase";
pub const ANIMATION_NAME_COLOR_CYCLE: &str = "colorcycle";
pub const ANIMATION_NAME_PIXELS: &str = "pixels";

/// Speed multiplier used when a request omits it
pub const DEFAULT_SPEED: f32 = 1.0;
/// Largest accepted speed multiplier
pub const MAX_SPEED: f32 = 100.0;

pub trait Animate {
    /// Render the frame at `elapsed` into `leds`
    fn render(&self, elapsed: Duration, leds: &mut [Rgbw]);

    /// Check parameters without clamping
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Active animation with its parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Animation {
    /// All pixels dark
    #[default]
    Off,
    /// Single solid color
    Solid(SolidParams),
    /// Color switching on and off
    Blink(BlinkParams),
    /// Color fading in and out
    Pulse(PulseParams),
    /// Hue wheel spread over the strip and rotating
    Rainbow(RainbowParams),
    /// Moving head with a fading tail
    Comet(CometParams),
    /// Lit segments marching along the strip
    Chase(ChaseParams),
    /// Whole strip stepping through a list of colors
    ColorCycle(ColorCycleParams),
    /// Per-pixel colors written by the client
    Pixels,
}

impl Animation {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Off => ANIMATION_NAME_OFF,
            Self::Solid(_) => ANIMATION_NAME_SOLID,
            Self::Blink(_) => ANIMATION_NAME_BLINK,
            Self::Pulse(_) => ANIMATION_NAME_PULSE,
            Self::Rainbow(_) => ANIMATION_NAME_RAINBOW,
            Self::Comet(_) => ANIMATION_NAME_COMET,
            Self::Chase(_) => ANIMATION_NAME_CHASE,
            Self::ColorCycle(_) => ANIMATION_NAME_COLOR_CYCLE,
            Self::Pixels => ANIMATION_NAME_PIXELS,
        }
    }

    /// Render the frame at `elapsed`
    ///
    /// `pixels` holds the client-written colors used by [`Animation::Pixels`].
    pub fn render(&self, elapsed: Duration, pixels: &[Rgbw], leds: &mut [Rgbw]) {
        match self {
            Self::Off => fill(leds, Rgbw::BLACK),
            Self::Solid(params) => params.render(elapsed, leds),
            Self::Blink(params) => params.render(elapsed, leds),
            Self::Pulse(params) => params.render(elapsed, leds),
            Self::Rainbow(params) => params.render(elapsed, leds),
            Self::Comet(params) => params.render(elapsed, leds),
            Self::Chase(params) => params.render(elapsed, leds),
            Self::ColorCycle(params) => params.render(elapsed, leds),
            Self::Pixels => {
                for (led, pixel) in leds.iter_mut().zip(pixels) {
                    *led = *pixel;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Off | Self::Pixels => Ok(()),
            Self::Solid(params) => params.validate(),
            Self::Blink(params) => params.validate(),
            Self::Pulse(params) => params.validate(),
            Self::Rainbow(params) => params.validate(),
            Self::Comet(params) => params.validate(),
            Self::Chase(params) => params.validate(),
            Self::ColorCycle(params) => params.validate(),
        }
    }
}

pub(crate) fn validate_speed(speed: f32) -> Result<(), ValidationError> {
    if speed > 0.0 && speed <= MAX_SPEED {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange("speed"))
    }
}
