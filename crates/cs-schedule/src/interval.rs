//! Fixed-interval schedule.

use std::fmt;

use cs_core::{Calendar, Tick};

use crate::{Schedule, ScheduleError, ScheduleResult};

/// Fires at `start`, `start + period`, `start + 2·period`, …
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period_secs: i64,
}

impl Interval {
    /// Period as the sum of the given units.  The total must be `> 0`.
    pub fn new(seconds: i64, minutes: i64, hours: i64, days: i64) -> ScheduleResult<Self> {
        let total = minutes
            .checked_mul(60)
            .and_then(|m| seconds.checked_add(m))
            .and_then(|t| t.checked_add(hours.checked_mul(3_600)?))
            .and_then(|t| t.checked_add(days.checked_mul(86_400)?))
            .ok_or_else(|| ScheduleError::Config("interval overflows i64 seconds".to_owned()))?;
        if total <= 0 {
            return Err(ScheduleError::Config(format!(
                "interval must total more than 0 seconds, got {total}"
            )));
        }
        Ok(Self { period_secs: total })
    }

    pub fn seconds(n: i64) -> ScheduleResult<Self> {
        Self::new(n, 0, 0, 0)
    }

    pub fn minutes(n: i64) -> ScheduleResult<Self> {
        Self::new(0, n, 0, 0)
    }

    pub fn hours(n: i64) -> ScheduleResult<Self> {
        Self::new(0, 0, n, 0)
    }

    pub fn days(n: i64) -> ScheduleResult<Self> {
        Self::new(0, 0, 0, n)
    }

    #[inline]
    pub fn period_secs(&self) -> i64 {
        self.period_secs
    }
}

impl Schedule for Interval {
    fn first_fire(&self, start: Tick, _calendar: &Calendar) -> ScheduleResult<Tick> {
        Ok(start)
    }

    fn next_fire(&self, last: Tick, _calendar: &Calendar) -> ScheduleResult<Tick> {
        last.checked_add(self.period_secs).ok_or_else(|| {
            ScheduleError::Config(format!("{self} after {last} overflows the tick range"))
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {}s", self.period_secs)
    }
}
