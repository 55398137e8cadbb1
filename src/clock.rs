//! Time source for the data access layer

use crate::utils::{date_string, now_millis, today_string};

/// Supplies "now" and "today" so day-based logic can be tested
pub trait Clock {
    /// Current time in epoch milliseconds
    fn now_millis(&self) -> i64;

    /// Current local calendar day, `YYYY-MM-DD`
    fn today(&self) -> String;
}

/// The system wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }

    fn today(&self) -> String {
        today_string()
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    millis: i64,
}

impl FixedClock {
    /// Freeze time at `millis`
    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self { millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis
    }

    fn today(&self) -> String {
        date_string(self.millis)
    }
}
