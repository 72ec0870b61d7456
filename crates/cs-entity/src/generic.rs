//! `GenericProcess` — an entity made of a single scheduled action.

use cs_schedule::{CronSchedule, Interval, Schedule};

use crate::{
    Action, Entity, EntityEnv, Periodic, Process, ProcessContext, ProcessResult,
};

/// One [`Action`] on any [`Schedule`], wrapped as an entity.
///
/// Saves writing an `Entity` impl for ad-hoc writers and readers.
pub struct GenericProcess<S, A> {
    name:     String,
    schedule: S,
    action:   A,
}

impl<S, A> GenericProcess<S, A>
where
    S: Schedule + 'static,
    A: Action + 'static,
{
    pub fn new(name: impl Into<String>, schedule: S, action: A) -> Self {
        Self { name: name.into(), schedule, action }
    }
}

impl<F> GenericProcess<Interval, F>
where
    F: FnMut(&mut ProcessContext<'_>) -> ProcessResult<()> + 'static,
{
    pub fn every(name: impl Into<String>, interval: Interval, action: F) -> Self {
        Self::new(name, interval, action)
    }
}

impl<F> GenericProcess<CronSchedule, F>
where
    F: FnMut(&mut ProcessContext<'_>) -> ProcessResult<()> + 'static,
{
    pub fn cron(name: impl Into<String>, schedule: CronSchedule, action: F) -> Self {
        Self::new(name, schedule, action)
    }
}

impl<S, A> Entity for GenericProcess<S, A>
where
    S: Schedule + 'static,
    A: Action + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
        let this = *self;
        Ok(vec![Box::new(Periodic::new(this.schedule, this.action))])
    }
}
