//! Time sources for the drive model.
//!
//! The state manager never reads the system clock directly; it asks a
//! [`Clock`] for monotonic seconds. Production uses [`SystemClock`], tests
//! drive simulated time with [`ManualClock`].

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

/// Monotonic seconds since an arbitrary epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now_secs(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Shared, hand-driven clock.
///
/// Clones observe the same time. It may be set backwards to simulate clock
/// skew.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `secs`.
    pub fn advance(&self, secs: f64) {
        *self.now.lock() += secs;
    }

    /// Jump to an absolute time.
    pub fn set(&self, secs: f64) {
        *self.now.lock() = secs;
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        *self.now.lock()
    }
}
