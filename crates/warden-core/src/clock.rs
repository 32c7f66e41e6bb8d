//! Time source abstraction so timeout logic can be tested deterministically.

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock frozen at the current wall-clock time.
    #[must_use]
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move forward by `by`. Overflowing advances are ignored.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| {
            tracing::warn!("ManualClock lock was poisoned, recovering");
            e.into_inner()
        });
        let next = TimeDelta::from_std(by)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta));
        match next {
            Some(next) => *now = next,
            None => tracing::warn!(?by, "ManualClock advance overflowed, ignoring"),
        }
    }

    /// Jump to `to`.
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| {
            tracing::warn!("ManualClock lock was poisoned, recovering");
            e.into_inner()
        });
        *now = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_now()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| {
            tracing::warn!("ManualClock lock was poisoned, recovering");
            e.into_inner()
        })
    }
}
