//! Frame timing

use std::time::Instant;

/// Monotonic time source (seconds)
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall clock, seconds since construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Deterministic clock: every read advances by a fixed step
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: f64,
    step: f64,
}

impl FixedClock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    /// Clock stepping at `fps` frames per second
    pub fn with_fps(fps: u32) -> Self {
        Self::new(1.0 / fps.max(1) as f64)
    }
}

impl Clock for FixedClock {
    fn now(&mut self) -> f64 {
        let now = self.time;
        self.time += self.step;
        now
    }
}

/// Delta time between consecutive frame timestamps
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<f64>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the timer so the first frame measures from `now`
    pub fn start(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Seconds since the previous call (0 on the first call)
    pub fn delta(&mut self, now: f64) -> f32 {
        let dt = self.last.map_or(0.0, |last| (now - last).max(0.0));
        self.last = Some(now);
        dt as f32
    }
}
