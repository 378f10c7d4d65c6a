//! Time oracle used to budget spatial queries
//!
//! Group collision and containment queries stop early once the clock reports
//! more seconds than the caller's `t + dt` window. The clock is external to
//! the geometry: anything monotonic and cheap can drive it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use super::math::Real;

/// Source of "seconds elapsed since start"
pub trait Clock {
    /// Seconds elapsed since the clock started. Must be monotonic.
    fn seconds_passed(&self) -> Real;
}

/// Wall clock measuring from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Create a clock starting now
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn seconds_passed(&self) -> Real {
        self.start.elapsed().as_secs_f64()
    }
}

/// Manually driven clock
///
/// Clones share the same time value, so a test can keep one handle and hand
/// another to a world.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Real>>,
}

impl ManualClock {
    /// Create a clock reading zero seconds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time; values earlier than the current reading are ignored
    pub fn set(&self, seconds: Real) {
        if seconds > self.now.get() {
            self.now.set(seconds);
        }
    }

    /// Advance the clock by `seconds`
    pub fn advance(&self, seconds: Real) {
        self.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn seconds_passed(&self) -> Real {
        self.now.get()
    }
}
