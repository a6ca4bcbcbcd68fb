//! Frame pacing.

use std::thread;
use std::time::{Duration, Instant};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Decides when the next frame runs.
pub trait Scheduler {
    /// Wait until the next frame is due.
    ///
    /// Returns the session clock at that frame, or `None` to stop the loop.
    fn request_next_tick(&mut self) -> Option<Duration>;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn request_next_tick(&mut self) -> Option<Duration> {
        (**self).request_next_tick()
    }
}

/// Wall-clock pacing at a fixed target rate.
///
/// A frame that overruns its slot delays the following ones instead of
/// triggering a burst of catch-up frames.
#[derive(Debug, Clone, Copy)]
pub struct RealtimeScheduler {
    start: Instant,
    period: Duration,
    next: Instant,
}

impl RealtimeScheduler {
    /// Pace frames at `target_fps` (at least 1).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let start = Instant::now();
        Self {
            start,
            period: Duration::from_secs(1) / target_fps.max(1),
            next: start,
        }
    }
}

impl Scheduler for RealtimeScheduler {
    fn request_next_tick(&mut self) -> Option<Duration> {
        self.next += self.period;
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        } else {
            self.next = now;
        }
        Some(self.start.elapsed())
    }
}

/// Simulated clock: frame `n` happens at exactly `n / fps` seconds, no sleeping.
#[derive(Debug, Clone, Copy)]
pub struct SteppedScheduler {
    fps: u32,
    frame: u64,
    limit: Option<u64>,
}

impl SteppedScheduler {
    /// Step at `fps` (at least 1) forever.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frame: 0,
            limit: None,
        }
    }

    /// Stop after `frames` ticks.
    #[must_use]
    pub const fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Ticks handed out so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }
}

impl Scheduler for SteppedScheduler {
    fn request_next_tick(&mut self) -> Option<Duration> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }
        self.frame += 1;
        let nanos = u128::from(self.frame) * NANOS_PER_SEC / u128::from(self.fps);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }
}

/// Frames completed per one-second window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    window_start: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Counter whose first window starts at clock zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            window_start: Duration::ZERO,
            frames: 0,
        }
    }

    /// Count a frame finished at `now`. Returns the rate when a window closes.
    pub fn record(&mut self, now: Duration) -> Option<u32> {
        self.frames = self.frames.saturating_add(1);
        if now.saturating_sub(self.window_start) < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames;
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }
}
