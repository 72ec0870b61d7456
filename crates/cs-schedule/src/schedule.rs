//! The `Schedule` trait.

use cs_core::{Calendar, Tick};

use crate::ScheduleResult;

/// A pure mapping from "last fired" to "next fire".
///
/// # Contract
///
/// - `next_fire(t)` returns a tick strictly greater than `t`.
/// - `first_fire(start)` returns a tick `>= start`.
/// - Both are deterministic and hold no state beyond the schedule's own
///   definition, so they can be unit-tested without an environment.
///
/// The calendar is passed in for schedules defined in wall-clock terms
/// (cron); fixed intervals ignore it.
pub trait Schedule {
    /// When a process starting at `start` fires first.
    fn first_fire(&self, start: Tick, calendar: &Calendar) -> ScheduleResult<Tick>;

    /// When the process fires after having fired at `last`.
    fn next_fire(&self, last: Tick, calendar: &Calendar) -> ScheduleResult<Tick>;
}

impl<S: Schedule + ?Sized> Schedule for Box<S> {
    fn first_fire(&self, start: Tick, calendar: &Calendar) -> ScheduleResult<Tick> {
        (**self).first_fire(start, calendar)
    }

    fn next_fire(&self, last: Tick, calendar: &Calendar) -> ScheduleResult<Tick> {
        (**self).next_fire(last, calendar)
    }
}
