//! Periodic wrappers: turn one `Action` into a process that repeats forever.

use cs_core::Tick;
use cs_schedule::{CronSchedule, Interval, Schedule};
use tracing::trace;

use crate::{Action, Process, ProcessContext, ProcessResult, Step};

/// Fires `action` at every tick produced by `schedule`.
///
/// On first resumption the schedule's first fire time is computed from the
/// current tick.  If that is now, the action runs immediately; otherwise the
/// process sleeps until then.  After each firing it sleeps until
/// `next_fire(last_fire)`.  Never returns [`Step::Done`].
pub struct Periodic<S, A> {
    schedule: S,
    action:   A,
    /// Next fire time, once known.
    due:      Option<Tick>,
}

impl<S: Schedule, A: Action> Periodic<S, A> {
    pub fn new(schedule: S, action: A) -> Self {
        Self { schedule, action, due: None }
    }

    pub fn schedule(&self) -> &S {
        &self.schedule
    }
}

impl<S: Schedule, A: Action> Process for Periodic<S, A> {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<Step> {
        let now = ctx.now();
        let due = match self.due {
            Some(t) => t,
            None => self.schedule.first_fire(now, ctx.calendar())?,
        };
        if due > now {
            self.due = Some(due);
            return Ok(Step::Sleep(due - now));
        }

        self.action.run(ctx)?;
        let next = self.schedule.next_fire(due, ctx.calendar())?;
        trace!(owner = ctx.owner(), fired = %due, next = %next, "periodic fire");
        self.due = Some(next);
        Ok(Step::Sleep(next - now))
    }
}

/// Run `action` now and then once per `interval`, forever.
pub fn every<F>(interval: Interval, action: F) -> Periodic<Interval, F>
where
    F: FnMut(&mut ProcessContext<'_>) -> ProcessResult<()>,
{
    Periodic::new(interval, action)
}

/// Run `action` at every match of `schedule`, forever.  A start exactly on a
/// match fires at the start.
pub fn cron<F>(schedule: CronSchedule, action: F) -> Periodic<CronSchedule, F>
where
    F: FnMut(&mut ProcessContext<'_>) -> ProcessResult<()>,
{
    Periodic::new(schedule, action)
}
