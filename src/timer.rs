use embassy_time::{Duration, Instant};

/// Monotonic elapsed-time counter of the active animation
///
/// Frames are a pure function of [`elapsed`](Self::elapsed), so an animation
/// renders the same at the same elapsed time regardless of frame rate.
#[derive(Debug, Clone, Copy)]
pub struct AnimationTimer {
    elapsed: Duration,
    last_tick: Option<Instant>,
}

impl Default for AnimationTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationTimer {
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::from_millis(0),
            last_tick: None,
        }
    }

    /// Restart from zero
    ///
    /// The next [`advance`](Self::advance) call reports zero elapsed time.
    pub fn reset(&mut self) {
        self.elapsed = Duration::from_millis(0);
        self.last_tick = None;
    }

    /// Account the time since the previous tick and return the total
    pub fn advance(&mut self, now: Instant) -> Duration {
        if let Some(last) = self.last_tick {
            if let Some(delta) = now.checked_duration_since(last) {
                self.elapsed += delta;
            }
        }
        self.last_tick = Some(now);
        self.elapsed
    }

    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
