use embassy_time::Instant;
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::Rgbw;
use crate::frame::Frame;
use crate::state::DeviceState;
use crate::timer::AnimationTimer;

/// Frame renderer
///
/// Owns the pixel buffer, which is reused for every frame.
pub struct Renderer<O: OutputDriver, const MAX_LEDS: usize> {
    output: O,
    frame_buffer: [Rgbw; MAX_LEDS],
    dropped_frames: u32,
}

impl<O: OutputDriver, const MAX_LEDS: usize> Renderer<O, MAX_LEDS> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            frame_buffer: [Rgbw::BLACK; MAX_LEDS],
            dropped_frames: 0,
        }
    }

    /// Compute the next frame and push it to the driver
    ///
    /// Cost is bounded by one frame computation and one driver write. A driver
    /// failure drops the frame and is only counted.
    pub fn advance(
        &mut self,
        state: &DeviceState<MAX_LEDS>,
        timer: &mut AnimationTimer,
        now: Instant,
    ) -> Frame<'_> {
        let elapsed = timer.advance(now);

        let leds = &mut self.frame_buffer[..state.pixel_count()];
        state.animation().render(elapsed, state.pixels(), leds);

        let level = state.brightness_level();
        if level != u8::MAX {
            for led in leds.iter_mut() {
                *led = led.scale(level);
            }
        }

        let frame = Frame::new(&self.frame_buffer[..state.pixel_count()], state.color_order());
        if let Err(_e) = self.output.write(&frame) {
            #[cfg(feature = "esp32-log")]
            println!("renderer: frame dropped: {:?}", _e);
            self.dropped_frames = self.dropped_frames.wrapping_add(1);
        }
        frame
    }

    /// Frames dropped because of driver failures
    pub const fn dropped_frames(&self) -> u32 {
        self.dropped_frames
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
