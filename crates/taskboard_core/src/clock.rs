//! Clock port for wall-time reads.
//!
//! # Responsibility
//! - Give alert scans and id allocation one substitutable source of "now".
//!
//! # Invariants
//! - Times are local, timezone-free `NaiveDateTime` values, matching how
//!   deadlines are entered and stored.

use chrono::{Local, NaiveDateTime};
use std::cell::Cell;

/// Supplies the current local wall time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Milliseconds since the Unix epoch, treating `now()` as UTC.
    ///
    /// Only used to derive monotonic ids, so the missing offset is irrelevant.
    fn now_millis(&self) -> i64 {
        self.now().and_utc().timestamp_millis()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Reads the host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually driven clock for deterministic tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Moves the clock to an absolute time.
    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    /// Moves the clock forward (or backward for negative durations).
    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn fixed_clock_advances_by_duration() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 2)
            .and_then(|day| day.and_hms_opt(18, 30, 0))
            .expect("fixture time should be valid");
        let clock = FixedClock::new(start);

        clock.advance(Duration::minutes(90));
        assert_eq!(clock.now(), start + Duration::minutes(90));
        assert_eq!(
            clock.now_millis(),
            (start + Duration::minutes(90)).and_utc().timestamp_millis()
        );
    }
}
