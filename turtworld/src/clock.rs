//! Time sources for completion tracking.
//!
//! The level reads the clock only when a player spawns and when the goal is
//! reached, so tests can drive it with [`ManualClock`].

use std::cell::Cell;
use std::time::Instant;

/// Monotonic time source measured in seconds from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds.max(0.0));
    }

    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}
