//! Frame timing and delta time.
//!
//! [`Time`] is updated by the [`App`](crate::app::App) before each tick.
//! Systems receive the delta directly as their `dt` argument; `Time` keeps the
//! running totals.

use std::time::{Duration, Instant};

/// Frame timing. Owned by the app and advanced once per tick.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// When the current frame started (wall clock).
    frame_start: Instant,
    /// Duration of the previous frame.
    delta: Duration,
    /// Total simulated time.
    elapsed: Duration,
    /// Tick counter.
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance by the wall-clock time since the last update.
    pub(crate) fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.frame_start;
        self.advance(delta);
        self.frame_start = now;
    }

    /// Advance by a fixed step.
    pub(crate) fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Mark the start of a frame without counting one.
    pub(crate) fn reset_frame_start(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Number of ticks run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
