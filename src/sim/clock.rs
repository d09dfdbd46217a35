//! Frame clock
//!
//! Turns a monotonic millisecond counter into per-frame delta time.

/// Delta-time source for the frame loop.
///
/// `previous` starts at zero, so the first tick reports the whole time since
/// the counter's origin unless the host primes the clock first. No clamping
/// happens here; callers that need a bound apply it themselves (see
/// `Settings::max_frame_delta`).
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the previous tick (seconds)
    previous: f64,
    /// Number of ticks so far
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `now_ms` as the previous timestamp without counting a tick
    pub fn prime(&mut self, now_ms: f64) {
        self.previous = now_ms / 1000.0;
    }

    /// Advance to `now_ms` and return seconds elapsed since the previous tick
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        // Subtract at full precision; a long-lived counter loses ms in f32
        let now = now_ms / 1000.0;
        let delta_time = (now - self.previous) as f32;
        debug_assert!(delta_time >= 0.0, "tick source went backwards");
        self.previous = now;
        self.frames += 1;
        delta_time
    }

    /// Timestamp of the last tick (seconds)
    pub fn previous(&self) -> f64 {
        self.previous
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
