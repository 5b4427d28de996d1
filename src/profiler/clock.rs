//! Time sources for span timers and sampling.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic wall clock reporting seconds
pub trait Clock {
    fn now_seconds(&self) -> f64;
}

/// Clock backed by `std::time::Instant`, zeroed at construction
#[derive(Debug, Clone, Copy)]
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
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Explicitly advanced clock for deterministic runs
///
/// Clones share the same time, so a workload can keep a handle and advance
/// the clock the profiler reads from.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`; negative steps are ignored
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}
