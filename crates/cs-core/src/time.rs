//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a whole-second `Tick` counter.  When a run is anchored to
//! the calendar the tick *is* the Unix timestamp, so conversion is exact:
//!
//!   wall_time = Tick(unix_secs)  ⇄  DateTime<Tz>
//!
//! The event axis underneath is finer.  `SimInstant` counts sub-ticks
//! (`SUBTICKS_PER_TICK` per tick) so the runner can place processes at
//! fractional offsets inside a tick and have them resume in a fixed order.
//! Processes never see the fraction: they read `instant.tick()` and wait in
//! whole ticks, which preserves their sub-tick phase from one wake-up to the
//! next.

use std::fmt;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::{CoreError, CoreResult};

/// Sub-tick resolution of the event axis.
pub const SUBTICKS_PER_TICK: i64 = 1_000_000;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation time in whole seconds.
///
/// Signed so that runs may be anchored before 1970.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub i64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self` (`n` may be negative).
    #[inline]
    pub fn offset(self, n: i64) -> Tick {
        Tick(self.0 + n)
    }

    /// `self + n`, or `None` if the result leaves the `i64` range.
    #[inline]
    pub fn checked_add(self, n: i64) -> Option<Tick> {
        self.0.checked_add(n).map(Tick)
    }

    /// Ticks elapsed from `earlier` to `self`.  Negative if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> i64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<i64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: i64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub<i64> for Tick {
    type Output = Tick;
    #[inline]
    fn sub(self, rhs: i64) -> Tick {
        Tick(self.0 - rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: Tick) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimInstant ────────────────────────────────────────────────────────────────

/// A position on the event axis, in sub-ticks.
///
/// Ordered lexicographically by (tick, phase), which is plain integer order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SimInstant(pub i64);

impl SimInstant {
    /// The instant at the very start of `tick` (phase 0).
    #[inline]
    pub fn at_tick(tick: Tick) -> SimInstant {
        SimInstant(tick.0.saturating_mul(SUBTICKS_PER_TICK))
    }

    /// Like [`at_tick`][Self::at_tick], but `None` for ticks the sub-tick
    /// axis cannot represent (beyond roughly ±292 000 years).
    #[inline]
    pub fn checked_at_tick(tick: Tick) -> Option<SimInstant> {
        tick.0.checked_mul(SUBTICKS_PER_TICK).map(SimInstant)
    }

    /// The whole tick this instant falls in (floor).
    #[inline]
    pub fn tick(self) -> Tick {
        Tick(self.0.div_euclid(SUBTICKS_PER_TICK))
    }

    /// Sub-tick offset within the owning tick, in `[0, SUBTICKS_PER_TICK)`.
    #[inline]
    pub fn phase(self) -> i64 {
        self.0.rem_euclid(SUBTICKS_PER_TICK)
    }

    /// The instant `ticks` whole ticks later, keeping the phase.
    #[inline]
    pub fn after_ticks(self, ticks: i64) -> SimInstant {
        SimInstant(self.0.saturating_add(ticks.saturating_mul(SUBTICKS_PER_TICK)))
    }

    #[inline]
    pub fn after_subticks(self, subticks: i64) -> SimInstant {
        SimInstant(self.0.saturating_add(subticks))
    }

    /// Convert a fractional tick delay into sub-ticks (rounded to nearest).
    ///
    /// Fails with [`CoreError::InvalidDelay`] for negative, NaN or infinite
    /// delays.
    pub fn delay_to_subticks(delay: f64) -> CoreResult<i64> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(CoreError::InvalidDelay(delay));
        }
        Ok((delay * SUBTICKS_PER_TICK as f64).round() as i64)
    }
}

impl fmt::Display for SimInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.tick(), self.phase())
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// Converts between ticks and timezone-aware calendar times.
///
/// `Calendar` is `Copy` and holds no heap data.  Conversions are lossless for
/// whole-second timestamps in both directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// Build a calendar from an IANA timezone name (`"Europe/Brussels"`).
    pub fn from_name(name: &str) -> CoreResult<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|e| CoreError::Config(format!("unknown timezone {name:?}: {e}")))
    }

    #[inline]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The calendar time of `tick` in this calendar's timezone.
    pub fn to_datetime(&self, tick: Tick) -> CoreResult<DateTime<Tz>> {
        match self.tz.timestamp_opt(tick.0, 0) {
            LocalResult::Single(dt) => Ok(dt),
            _ => Err(CoreError::Time(format!("{tick} is outside the representable calendar range"))),
        }
    }

    /// The tick of a calendar time.
    ///
    /// The calendar time must be in this calendar's timezone; mixing zones
    /// inside one run is a configuration error.
    pub fn to_tick(&self, dt: &DateTime<Tz>) -> CoreResult<Tick> {
        if dt.timezone() != self.tz {
            return Err(CoreError::Config(format!(
                "calendar time {dt} is in timezone {}, run timezone is {}",
                dt.timezone(),
                self.tz
            )));
        }
        Ok(Tick(dt.timestamp()))
    }

    /// Interpret a naive local time in this calendar's timezone.
    ///
    /// Ambiguous local times (DST fold) resolve to the earliest instant.
    /// Local times that do not exist (DST gap) return `None`.
    pub fn local_to_tick(&self, naive: &NaiveDateTime) -> Option<Tick> {
        self.tz
            .from_local_datetime(naive)
            .earliest()
            .map(|dt| Tick(dt.timestamp()))
    }

    /// The naive local wall time of `tick`.
    pub fn to_local(&self, tick: Tick) -> CoreResult<NaiveDateTime> {
        self.to_datetime(tick).map(|dt| dt.naive_local())
    }

    /// RFC 3339 rendering of `tick`, used by output writers.
    pub fn format(&self, tick: Tick) -> CoreResult<String> {
        self.to_datetime(tick).map(|dt| dt.to_rfc3339())
    }

    /// Whole seconds in a calendar span, truncated toward zero.
    #[inline]
    pub fn span_to_ticks(span: chrono::Duration) -> i64 {
        span.num_seconds()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tz)
    }
}
