use core::mem::discriminant;

use crate::{
    animation::Animation,
    color::{ColorOrder, Rgbw},
    error::{ConfigError, ValidationError},
    math8::unit_to_u8,
    timer::AnimationTimer,
};

/// Startup configuration of the strip
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub pixel_count: usize,
    pub color_order: ColorOrder,
    pub brightness: f32,
    pub animation: Animation,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            pixel_count: 30,
            color_order: ColorOrder::Grb,
            brightness: 1.0,
            animation: Animation::Off,
        }
    }
}

/// Diagnostics counters reported by `/status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Frames dropped because the LED driver failed
    pub dropped_frames: u32,
    /// Requests discarded as malformed or oversized
    pub malformed_requests: u32,
    /// Connections refused while another one was active
    pub refused_connections: u32,
    /// Connections closed by the idle timeout
    pub timed_out_connections: u32,
}

/// Shared device state
///
/// Written only by the dispatcher, read by the renderer once per tick.
#[derive(Debug, Clone)]
pub struct DeviceState<const MAX_LEDS: usize> {
    animation: Animation,
    brightness: f32,
    pixel_count: usize,
    color_order: ColorOrder,
    pixels: [Rgbw; MAX_LEDS],
}

impl<const MAX_LEDS: usize> DeviceState<MAX_LEDS> {
    /// Create the state from a startup configuration
    ///
    /// Nothing is clamped: an invalid configuration is rejected.
    pub fn new(config: &DeviceConfig) -> Result<Self, ConfigError> {
        if config.pixel_count == 0 || config.pixel_count > MAX_LEDS {
            return Err(ConfigError::PixelCount);
        }
        if !is_valid_brightness(config.brightness) {
            return Err(ConfigError::Brightness);
        }
        config.animation.validate().map_err(ConfigError::Animation)?;

        Ok(Self {
            animation: config.animation.clone(),
            brightness: config.brightness,
            pixel_count: config.pixel_count,
            color_order: config.color_order,
            pixels: [Rgbw::BLACK; MAX_LEDS],
        })
    }

    pub const fn animation(&self) -> &Animation {
        &self.animation
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Brightness as an 8-bit scale factor
    pub fn brightness_level(&self) -> u8 {
        unit_to_u8(self.brightness)
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub const fn color_order(&self) -> ColorOrder {
        self.color_order
    }

    /// Client-written pixels shown by [`Animation::Pixels`]
    pub fn pixels(&self) -> &[Rgbw] {
        &self.pixels[..self.pixel_count]
    }

    /// Switch the animation and restart its timer
    ///
    /// The next frame is the new animation's frame at elapsed time zero.
    pub fn set_animation(&mut self, animation: Animation, timer: &mut AnimationTimer) {
        if animation == Animation::Pixels && self.animation != Animation::Pixels {
            self.pixels = [Rgbw::BLACK; MAX_LEDS];
        }
        self.animation = animation;
        timer.reset();
    }

    /// Replace the parameters of the running animation
    ///
    /// The timer keeps running while the variant stays the same, so a speed
    /// or color change does not restart the animation.
    pub fn patch_animation(&mut self, animation: Animation, timer: &mut AnimationTimer) {
        if discriminant(&animation) == discriminant(&self.animation) {
            self.animation = animation;
        } else {
            self.set_animation(animation, timer);
        }
    }

    /// Set the global brightness, rejecting values outside `0.0..=1.0`
    pub fn set_brightness(&mut self, brightness: f32) -> Result<(), ValidationError> {
        if !is_valid_brightness(brightness) {
            return Err(ValidationError::OutOfRange("value"));
        }
        self.brightness = brightness;
        Ok(())
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgbw] {
        &mut self.pixels[..self.pixel_count]
    }
}

pub(crate) fn is_valid_brightness(brightness: f32) -> bool {
    (0.0..=1.0).contains(&brightness)
}
