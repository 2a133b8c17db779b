//! Time source for validity checks

use std::fmt;
use std::time::SystemTime;

/// Supplies "now" to the temporal checks of the pipeline
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current time
    fn now(&self) -> SystemTime;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> SystemTime {
        self.0
    }
}
