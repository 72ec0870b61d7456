//! Five-field cron schedules.
//!
//! # Syntax
//!
//! ```text
//! minute  hour  day-of-month  month  day-of-week
//! 0-59    0-23  1-31          1-12   0-7 (0 and 7 are Sunday)
//! ```
//!
//! Each field accepts `*`, a number `n`, a range `a-b`, a step `*/s`, `a-b/s`
//! or `n/s` (from `n` to the field maximum), and comma-separated lists of
//! those.  Names (`MON`, `JAN`) and the `@hourly` macros are not supported.
//!
//! # Day matching
//!
//! When both day-of-month and day-of-week are restricted (neither starts with
//! `*`) a day matches if *either* matches, as in Vixie cron.  Otherwise only
//! the restricted one applies.
//!
//! # Evaluation
//!
//! Fire times are searched minute by minute in the calendar's local wall
//! time, skipping whole months, days and hours that cannot match.  Local
//! times inside a DST gap are skipped; local times inside a DST fold resolve
//! to their earliest instant.  Every fire time is strictly later than the
//! previous one.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use cs_core::{Calendar, Tick};
use tracing::trace;

use crate::{Schedule, ScheduleError, ScheduleResult};

/// How far ahead (in calendar years) a search runs before giving up.
const SEARCH_YEARS: i32 = 8;

// ── Field ─────────────────────────────────────────────────────────────────────

/// One parsed cron field as a bitset over its value range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Field {
    bits:       u64,
    /// `false` when the field text starts with `*`.
    restricted: bool,
}

impl Field {
    fn parse(name: &'static str, text: &str, min: u32, max: u32) -> ScheduleResult<Self> {
        let invalid = |reason: String| ScheduleError::InvalidCron { field: name, text: text.to_owned(), reason };
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid("empty field".to_owned()));
        }

        let number = |s: &str| -> ScheduleResult<u32> {
            let n: u32 = s.parse().map_err(|_| invalid(format!("{s:?} is not a number")))?;
            if n < min || n > max {
                return Err(invalid(format!("{n} is outside {min}-{max}")));
            }
            Ok(n)
        };

        let mut bits = 0u64;
        for part in text.split(',') {
            let (range, step) = match part.split_once('/') {
                Some((r, s)) => {
                    let step: u32 = s.parse().map_err(|_| invalid(format!("step {s:?} is not a number")))?;
                    if step == 0 {
                        return Err(invalid("step must be positive".to_owned()));
                    }
                    (r, Some(step))
                }
                None => (part, None),
            };

            let (lo, hi) = if range == "*" {
                (min, max)
            } else if let Some((a, b)) = range.split_once('-') {
                let (lo, hi) = (number(a)?, number(b)?);
                if lo > hi {
                    return Err(invalid(format!("range {lo}-{hi} is reversed")));
                }
                (lo, hi)
            } else {
                let n = number(range)?;
                // `n/s` runs from n to the end of the field.
                if step.is_some() { (n, max) } else { (n, n) }
            };

            for v in (lo..=hi).step_by(step.unwrap_or(1) as usize) {
                bits |= 1u64 << v;
            }
        }

        Ok(Self { bits, restricted: !text.starts_with('*') })
    }

    #[inline]
    fn contains(&self, v: u32) -> bool {
        self.bits & (1u64 << v) != 0
    }
}

// ── CronSchedule ──────────────────────────────────────────────────────────────

/// A parsed cron expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CronSchedule {
    minute:  Field,
    hour:    Field,
    day:     Field,
    month:   Field,
    weekday: Field,
    expr:    String,
}

impl CronSchedule {
    /// Parse the five fields separately.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::InvalidCron`] naming the first field that does not
    /// parse or is out of range.
    pub fn new(minute: &str, hour: &str, day: &str, month: &str, weekday: &str) -> ScheduleResult<Self> {
        let mut weekday_field = Field::parse("weekday", weekday, 0, 7)?;
        // Fold 7 onto 0 so both spell Sunday.
        if weekday_field.contains(7) {
            weekday_field.bits = (weekday_field.bits & !(1u64 << 7)) | 1;
        }
        Ok(Self {
            minute:  Field::parse("minute", minute, 0, 59)?,
            hour:    Field::parse("hour", hour, 0, 23)?,
            day:     Field::parse("day", day, 1, 31)?,
            month:   Field::parse("month", month, 1, 12)?,
            weekday: weekday_field,
            expr:    [minute, hour, day, month, weekday].map(str::trim).join(" "),
        })
    }

    /// Start a builder with every field set to `*`.
    pub fn builder() -> CronBuilder {
        CronBuilder::default()
    }

    /// The normalised expression text.
    pub fn expression(&self) -> &str {
        &self.expr
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        let dom = self.day.contains(date.day());
        let dow = self.weekday.contains(date.weekday().num_days_from_sunday());
        match (self.day.restricted, self.weekday.restricted) {
            (true, true) => dom || dow,
            (true, false) => dom,
            (false, true) => dow,
            (false, false) => true,
        }
    }

    /// The first matching local minute strictly after `after`.
    fn next_local(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        let mut t = after.with_second(0)?.with_nanosecond(0)? + Duration::minutes(1);
        let horizon = after.year() + SEARCH_YEARS;

        while t.year() <= horizon {
            if !self.month.contains(t.month()) {
                t = first_of_next_month(t.date())?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.day_matches(t.date()) {
                t = t.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            if !self.hour.contains(t.hour()) {
                t = t.date().and_hms_opt(t.hour(), 0, 0)? + Duration::hours(1);
                continue;
            }
            if !self.minute.contains(t.minute()) {
                t += Duration::minutes(1);
                continue;
            }
            return Some(t);
        }
        None
    }
}

fn first_of_next_month(d: NaiveDate) -> Option<NaiveDate> {
    if d.month() == 12 {
        NaiveDate::from_ymd_opt(d.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(d.year(), d.month() + 1, 1)
    }
}

impl Schedule for CronSchedule {
    /// A start exactly on a match fires at the start.
    fn first_fire(&self, start: Tick, calendar: &Calendar) -> ScheduleResult<Tick> {
        self.next_fire(start - 1, calendar)
    }

    fn next_fire(&self, last: Tick, calendar: &Calendar) -> ScheduleResult<Tick> {
        let mut local = calendar.to_local(last)?;
        loop {
            let candidate = self
                .next_local(local)
                .ok_or_else(|| ScheduleError::NoMatch(self.expr.clone()))?;
            match calendar.local_to_tick(&candidate) {
                Some(tick) if tick > last => return Ok(tick),
                resolved => {
                    trace!(cron = %self.expr, %candidate, ?resolved, "skipping local time across DST transition");
                    local = candidate;
                }
            }
        }
    }
}

impl FromStr for CronSchedule {
    type Err = ScheduleError;

    /// Parse `"m h dom mon dow"` (whitespace separated, exactly five fields).
    fn from_str(s: &str) -> ScheduleResult<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        match fields.as_slice() {
            [m, h, dom, mon, dow] => Self::new(m, h, dom, mon, dow),
            _ => Err(ScheduleError::Config(format!(
                "cron expression {s:?} must have 5 fields, found {}",
                fields.len()
            ))),
        }
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cron({})", self.expr)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent construction of a [`CronSchedule`]; unset fields are `*`.
///
/// ```rust,ignore
/// let every_two_minutes = CronSchedule::builder().minute("*/2").build()?;
/// ```
#[derive(Clone, Debug)]
pub struct CronBuilder {
    minute:  String,
    hour:    String,
    day:     String,
    month:   String,
    weekday: String,
}

impl Default for CronBuilder {
    fn default() -> Self {
        Self {
            minute:  "*".into(),
            hour:    "*".into(),
            day:     "*".into(),
            month:   "*".into(),
            weekday: "*".into(),
        }
    }
}

impl CronBuilder {
    pub fn minute(mut self, field: impl Into<String>) -> Self {
        self.minute = field.into();
        self
    }

    pub fn hour(mut self, field: impl Into<String>) -> Self {
        self.hour = field.into();
        self
    }

    pub fn day(mut self, field: impl Into<String>) -> Self {
        self.day = field.into();
        self
    }

    pub fn month(mut self, field: impl Into<String>) -> Self {
        self.month = field.into();
        self
    }

    pub fn weekday(mut self, field: impl Into<String>) -> Self {
        self.weekday = field.into();
        self
    }

    pub fn build(self) -> ScheduleResult<CronSchedule> {
        CronSchedule::new(&self.minute, &self.hour, &self.day, &self.month, &self.weekday)
    }
}
