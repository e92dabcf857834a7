//! Cooperative run loop
//!
//! Provides portable frame pacing and request servicing without async/await
//! or platform-specific timers. The caller is responsible for sleeping
//! between ticks.

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::dispatcher;
use crate::error::ProtocolError;
use crate::http::{DEFAULT_IDLE_TIMEOUT, ReadOutcome, RequestReader, StatusCode};
use crate::renderer::Renderer;
use crate::state::{DeviceState, Diagnostics};
use crate::timer::AnimationTimer;
use crate::{OutputDriver, SocketLayer};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Timing and network settings of the run loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Connection without progress for this long is closed
    pub idle_timeout: Duration,
    /// Target interval between frames
    pub frame_duration: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            frame_duration: DEFAULT_FRAME_DURATION,
        }
    }
}

/// What happened on the network side during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestActivity {
    /// No connection or no new bytes
    Idle,
    /// Request bytes buffered, request incomplete
    Partial,
    /// Request dispatched and answered with this status
    Served(StatusCode),
    /// Request discarded and connection closed without a response
    Rejected(ProtocolError),
    /// Connection closed by the idle timeout
    TimedOut,
}

/// Result of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// The LED driver rejected this tick's frame.
    pub frame_dropped: bool,
    pub request: RequestActivity,
}

/// Poll-driven server loop owning the device state.
///
/// Each tick:
/// - Advances the renderer and pushes one frame to the LED driver
/// - Performs at most one non-blocking socket read
/// - Dispatches and answers a request once it is complete
///
/// # Usage
///
/// ```ignore
/// let state = DeviceState::<60>::new(&DeviceConfig::default())?;
/// let mut server = RunLoop::new(state, driver, socket, &ServerConfig::default());
///
/// loop {
///     let report = server.tick(Instant::now());
///
///     // Platform-specific sleep
///     sleep_ms(report.sleep_duration.as_millis());
/// }
/// ```
pub struct RunLoop<O: OutputDriver, S: SocketLayer, const MAX_LEDS: usize> {
    state: DeviceState<MAX_LEDS>,
    timer: AnimationTimer,
    renderer: Renderer<O, MAX_LEDS>,
    reader: RequestReader<S>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<O: OutputDriver, S: SocketLayer, const MAX_LEDS: usize> RunLoop<O, S, MAX_LEDS> {
    pub fn new(state: DeviceState<MAX_LEDS>, driver: O, socket: S, config: &ServerConfig) -> Self {
        Self {
            state,
            timer: AnimationTimer::new(),
            renderer: Renderer::new(driver),
            reader: RequestReader::with_idle_timeout(socket, config.idle_timeout),
            next_frame: Instant::from_millis(0),
            frame_duration: config.frame_duration,
        }
    }

    /// Run one full tick and return timing information.
    ///
    /// Frame advancement always precedes request servicing, and at most one
    /// request is served per tick. Never blocks and never fails.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        // Drift correction: skip the backlog after a long stall instead of
        // bursting frames to catch up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let frame_dropped = self.advance(now);
        let request = self.poll(now);

        self.next_frame += self.frame_duration;
        let sleep_duration = self
            .next_frame
            .checked_duration_since(now)
            .unwrap_or(Duration::from_millis(0));

        TickReport {
            next_deadline: self.next_frame,
            sleep_duration,
            frame_dropped,
            request,
        }
    }

    /// Compute and output the next frame
    ///
    /// Returns `true` if the driver dropped the frame.
    pub fn advance(&mut self, now: Instant) -> bool {
        let dropped_before = self.renderer.dropped_frames();
        self.renderer.advance(&self.state, &mut self.timer, now);
        self.renderer.dropped_frames() != dropped_before
    }

    /// Make progress on the network side with a single non-blocking read
    pub fn poll(&mut self, now: Instant) -> RequestActivity {
        let diagnostics = self.diagnostics();

        match self.reader.try_read(now) {
            ReadOutcome::Empty => RequestActivity::Idle,
            ReadOutcome::Partial => RequestActivity::Partial,
            ReadOutcome::Malformed(error) => RequestActivity::Rejected(error),
            ReadOutcome::TimedOut => RequestActivity::TimedOut,
            ReadOutcome::Complete(request) => {
                let response =
                    dispatcher::handle(&request, &mut self.state, &mut self.timer, &diagnostics);
                if let Err(_e) = self.reader.respond(&response) {
                    #[cfg(feature = "esp32-log")]
                    println!("http: response not delivered: {:?}", _e);
                }
                RequestActivity::Served(response.status())
            }
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let stats = self.reader.stats();
        Diagnostics {
            dropped_frames: self.renderer.dropped_frames(),
            malformed_requests: stats.malformed,
            refused_connections: stats.refused,
            timed_out_connections: stats.timed_out,
        }
    }

    pub const fn state(&self) -> &DeviceState<MAX_LEDS> {
        &self.state
    }

    pub const fn timer(&self) -> &AnimationTimer {
        &self.timer
    }

    pub const fn renderer(&self) -> &Renderer<O, MAX_LEDS> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<O, MAX_LEDS> {
        &mut self.renderer
    }

    pub const fn reader(&self) -> &RequestReader<S> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut RequestReader<S> {
        &mut self.reader
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}
