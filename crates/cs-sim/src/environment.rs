//! The `Environment` — simulated clock plus pending-event queue.

use chrono::DateTime;
use cs_core::{Calendar, ProcessId, SimInstant, Tick, Tz};
use cs_entity::{ObservationSink, Process, ProcessContext, Step};
use cs_schedule::WakeQueue;
use cs_store::StateStore;
use tracing::{debug, info, trace};

use crate::{SimError, SimResult};

/// Simulated span between two `info!` progress events of one `run`.
pub const DEFAULT_PROGRESS_INTERVAL: i64 = 3_600;

/// A registered process and the entity it belongs to.
struct Slot {
    owner:   String,
    /// `None` once the process has returned `Step::Done`.
    process: Option<Box<dyn Process>>,
}

/// Owns simulated time, the wake queue, every registered process, and the
/// shared [`StateStore`].
///
/// Simulated time only changes inside [`run`][Self::run] and never moves
/// backward.
pub struct Environment {
    instant:  SimInstant,
    calendar: Calendar,
    queue:    WakeQueue,
    slots:    Vec<Slot>,
    store:    StateStore,
    progress: i64,
}

impl Environment {
    pub fn new(initial: Tick, calendar: Calendar) -> Self {
        Self::with_store(initial, calendar, StateStore::new())
    }

    /// Start from a pre-populated (or differently configured) store.
    pub fn with_store(initial: Tick, calendar: Calendar, store: StateStore) -> Self {
        Self {
            instant: SimInstant::at_tick(initial),
            calendar,
            queue: WakeQueue::new(),
            slots: Vec::new(),
            store,
            progress: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.instant.tick()
    }

    #[inline]
    pub fn instant(&self) -> SimInstant {
        self.instant
    }

    #[inline]
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn datetime(&self) -> SimResult<DateTime<Tz>> {
        Ok(self.calendar.to_datetime(self.now())?)
    }

    // ── State ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// Queued wake-ups.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Processes registered so far, finished ones included.
    pub fn process_count(&self) -> usize {
        self.slots.len()
    }

    // ── Scheduling ────────────────────────────────────────────────────────

    /// Register `process` to start `delay` ticks from now.  `delay` may be
    /// fractional; it is rounded to the sub-tick grid.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidDelay`] if `delay` is negative or not finite.
    pub fn schedule(
        &mut self,
        owner:   impl Into<String>,
        process: Box<dyn Process>,
        delay:   f64,
    ) -> SimResult<ProcessId> {
        let owner = owner.into();
        let subticks = match SimInstant::delay_to_subticks(delay) {
            Ok(s) => s,
            Err(_) => {
                return Err(SimError::InvalidDelay { entity: owner, process: self.next_id()?, delay });
            }
        };
        self.schedule_after(owner, process, subticks)
    }

    /// [`schedule`][Self::schedule] with the delay given in sub-ticks.
    pub fn schedule_after(
        &mut self,
        owner:    impl Into<String>,
        process:  Box<dyn Process>,
        subticks: i64,
    ) -> SimResult<ProcessId> {
        let owner = owner.into();
        let id = self.next_id()?;
        if subticks < 0 {
            return Err(SimError::InvalidDelay {
                entity:  owner,
                process: id,
                delay:   subticks as f64 / cs_core::SUBTICKS_PER_TICK as f64,
            });
        }
        let at = self.instant.after_subticks(subticks);
        trace!(%id, owner = %owner, %at, "process scheduled");
        self.slots.push(Slot { owner, process: Some(process) });
        self.queue.push(at, id);
        Ok(id)
    }

    fn next_id(&self) -> SimResult<ProcessId> {
        ProcessId::try_from(self.slots.len())
            .map_err(|_| SimError::Config("too many processes".to_owned()))
    }

    /// Log an `info!` progress event each time a run crosses another
    /// `ticks` of simulated time.  `0` or less turns progress events off.
    pub fn set_progress_interval(&mut self, ticks: i64) {
        self.progress = ticks;
    }

    // ── Event loop ────────────────────────────────────────────────────────

    /// Resume processes in (instant, insertion) order until no wake-up
    /// remains before `until`, then set the clock to `until`.
    ///
    /// `until` earlier than now is a no-op.  The first process error aborts
    /// the run; the clock then stays at the failing instant.
    pub fn run(&mut self, until: Tick, sink: &mut dyn ObservationSink) -> SimResult<()> {
        let limit = SimInstant::at_tick(until);
        if limit < self.instant {
            debug!(now = %self.now(), %until, "run target is in the past; nothing to do");
            return Ok(());
        }

        let every = self.progress;
        let mut next_report = if every > 0 { self.now().checked_add(every) } else { None };
        let mut resumed = 0_usize;
        while let Some((at, id)) = self.queue.pop_before(limit) {
            self.instant = at;
            self.resume(id, sink)?;
            resumed += 1;

            let now = at.tick();
            if next_report.is_some_and(|r| now >= r) {
                info!(%now, %until, resumed, pending = self.queue.len(), "run progress");
                next_report = now.checked_add(every);
            }
        }
        self.instant = limit;
        debug!(now = %until, resumed, pending = self.queue.len(), "run segment finished");
        Ok(())
    }

    fn resume(&mut self, id: ProcessId, sink: &mut dyn ObservationSink) -> SimResult<()> {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return Ok(());
        };
        let Some(process) = slot.process.as_mut() else {
            return Ok(());
        };

        trace!(%id, owner = %slot.owner, at = %self.instant, "resume");
        let mut ctx = ProcessContext::new(self.instant, self.calendar, &slot.owner, &mut self.store, sink);
        let step = process
            .resume(&mut ctx)
            .map_err(|source| SimError::Process { entity: slot.owner.clone(), source })?;

        match step {
            Step::Sleep(ticks) if ticks < 0 => Err(SimError::InvalidDelay {
                entity:  slot.owner.clone(),
                process: id,
                delay:   ticks as f64,
            }),
            Step::Sleep(ticks) => {
                self.queue.push(self.instant.after_ticks(ticks), id);
                Ok(())
            }
            Step::Done => {
                debug!(%id, owner = %slot.owner, now = %self.instant.tick(), "process finished");
                slot.process = None;
                Ok(())
            }
        }
    }
}
