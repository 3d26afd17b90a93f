// ============================
// crates/common/src/clock.rs
// ============================
//! Monotonic time source used for session expiry.
use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};

/// Source of monotonic instants
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant according to this clock
    fn now(&self) -> Instant;
}

/// Clock backed by `Instant::now()`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Shared between a store and a test so
/// that expiry can be exercised without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}
