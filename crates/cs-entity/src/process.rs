//! The `Process` trait and the context it runs in.

use chrono::DateTime;
use cs_core::{Calendar, SimInstant, Tick, Tz, Value};
use cs_store::StateStore;

use crate::{ObservationSink, ProcessResult};

/// What a process wants after one resumption.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Resume again this many whole ticks later.  `0` yields to every process
    /// already due at the current instant, then resumes at the same tick.
    /// Negative values are a defect and abort the run.
    Sleep(i64),
    /// The process is finished.
    Done,
}

/// One logical, independently-suspendable sequence of steps.
///
/// Implementations keep whatever state they need between resumptions in
/// `self`; a process that loops forever just never returns [`Step::Done`].
pub trait Process {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<Step>;
}

/// Everything a process may touch while it runs.
///
/// Built by the environment for a single resumption.
pub struct ProcessContext<'a> {
    instant:  SimInstant,
    calendar: Calendar,
    owner:    &'a str,
    store:    &'a mut StateStore,
    sink:     &'a mut dyn ObservationSink,
}

impl<'a> ProcessContext<'a> {
    #[inline]
    pub fn new(
        instant:  SimInstant,
        calendar: Calendar,
        owner:    &'a str,
        store:    &'a mut StateStore,
        sink:     &'a mut dyn ObservationSink,
    ) -> Self {
        Self { instant, calendar, owner, store, sink }
    }

    /// Current simulated time in whole ticks.
    #[inline]
    pub fn now(&self) -> Tick {
        self.instant.tick()
    }

    /// Current position on the sub-tick event axis.
    #[inline]
    pub fn instant(&self) -> SimInstant {
        self.instant
    }

    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn datetime(&self) -> ProcessResult<DateTime<Tz>> {
        Ok(self.calendar.to_datetime(self.now())?)
    }

    /// Name of the entity that owns the running process.
    #[inline]
    pub fn owner(&self) -> &str {
        self.owner
    }

    #[inline]
    pub fn store(&self) -> &StateStore {
        &*self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut *self.store
    }

    /// Append an observation at the current tick.
    pub fn record(&mut self, name: &str, value: impl Into<Value>) {
        let (value, now) = (value.into(), self.now());
        self.sink.store(name, &value, now);
    }
}
