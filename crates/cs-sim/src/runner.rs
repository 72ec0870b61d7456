//! `SimulationRunner` — builds the environment and wires entities into it.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration};
use cs_core::{Calendar, SUBTICKS_PER_TICK, SimInstant, Tick, Tz};
use cs_entity::{Entity, EntityEnv, ObservationSink, Process};
use cs_store::{CollisionPolicy, StateStore};
use tracing::info;

use crate::{Environment, SimError, SimResult};

/// First and last stagger offset, in sub-ticks (0.005 and 0.995 ticks).
const STAGGER_FIRST: i64 = SUBTICKS_PER_TICK / 200;
const STAGGER_LAST: i64 = SUBTICKS_PER_TICK - STAGGER_FIRST;

// ── Time arguments ────────────────────────────────────────────────────────────

/// Where a run starts: a raw tick or a calendar time.
///
/// A calendar start fixes the run's timezone, overriding any timezone given
/// separately.
#[derive(Clone, Debug, PartialEq)]
pub enum StartTime {
    Tick(Tick),
    DateTime(DateTime<Tz>),
}

impl Default for StartTime {
    fn default() -> Self {
        StartTime::Tick(Tick::ZERO)
    }
}

impl From<Tick> for StartTime {
    fn from(t: Tick) -> Self {
        StartTime::Tick(t)
    }
}

impl From<i64> for StartTime {
    fn from(secs: i64) -> Self {
        StartTime::Tick(Tick(secs))
    }
}

impl From<DateTime<Tz>> for StartTime {
    fn from(dt: DateTime<Tz>) -> Self {
        StartTime::DateTime(dt)
    }
}

/// Absolute target of [`SimulationRunner::run`].
#[derive(Clone, Debug, PartialEq)]
pub enum Until {
    Tick(Tick),
    /// Must be in the run's timezone.
    DateTime(DateTime<Tz>),
}

impl From<Tick> for Until {
    fn from(t: Tick) -> Self {
        Until::Tick(t)
    }
}

impl From<i64> for Until {
    fn from(secs: i64) -> Self {
        Until::Tick(Tick(secs))
    }
}

impl From<DateTime<Tz>> for Until {
    fn from(dt: DateTime<Tz>) -> Self {
        Until::DateTime(dt)
    }
}

/// Relative target of [`SimulationRunner::run_for`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RunDuration {
    Ticks(i64),
    /// Truncated to whole seconds.
    Span(Duration),
}

impl From<i64> for RunDuration {
    fn from(n: i64) -> Self {
        RunDuration::Ticks(n)
    }
}

impl From<Duration> for RunDuration {
    fn from(d: Duration) -> Self {
        RunDuration::Span(d)
    }
}

// ── Stagger ───────────────────────────────────────────────────────────────────

/// `n` start offsets in sub-ticks, linearly spaced over `[0.005, 0.995]` of a
/// tick.  A single process starts at `0.005`.
///
/// Strictly increasing as long as `n` does not exceed the number of sub-ticks
/// in that span; beyond it equal offsets fall back to registration order.
pub fn stagger_offsets(n: usize) -> Vec<i64> {
    match n {
        0 => Vec::new(),
        1 => vec![STAGGER_FIRST],
        _ => {
            let span = (STAGGER_LAST - STAGGER_FIRST) as i128;
            let gaps = (n - 1) as i128;
            (0..n)
                .map(|i| STAGGER_FIRST + (i as i128 * span / gaps) as i64)
                .collect()
        }
    }
}

// ── SimulationRunner ──────────────────────────────────────────────────────────

/// Composes an [`Environment`] and a fixed set of entities.
///
/// Construction calls every entity's `initialize` in list order and schedules
/// the collected processes at their stagger offsets.  Nothing runs until
/// [`run`][Self::run] or [`run_for`][Self::run_for].
pub struct SimulationRunner {
    env:      Environment,
    entities: Vec<String>,
}

impl SimulationRunner {
    pub fn new(
        entities:     Vec<Box<dyn Entity>>,
        initial_time: impl Into<StartTime>,
        timezone:     Tz,
    ) -> SimResult<Self> {
        Self::assemble(entities, initial_time.into(), timezone, CollisionPolicy::default())
    }

    pub(crate) fn assemble(
        entities:     Vec<Box<dyn Entity>>,
        initial_time: StartTime,
        timezone:     Tz,
        policy:       CollisionPolicy,
    ) -> SimResult<Self> {
        let (start, calendar) = match initial_time {
            StartTime::Tick(t) => (t, Calendar::new(timezone)),
            StartTime::DateTime(dt) => {
                let calendar = Calendar::new(dt.timezone());
                (calendar.to_tick(&dt)?, calendar)
            }
        };

        let mut seen = BTreeSet::new();
        for entity in &entities {
            if !seen.insert(entity.name().to_owned()) {
                return Err(SimError::Config(format!("duplicate entity name {:?}", entity.name())));
            }
        }

        let env_view = EntityEnv::new(start, calendar);
        let mut names = Vec::with_capacity(entities.len());
        let mut processes: Vec<(String, Box<dyn Process>)> = Vec::new();
        for entity in entities {
            let name = entity.name().to_owned();
            let declared = entity
                .initialize(&env_view)
                .map_err(|source| SimError::Process { entity: name.clone(), source })?;
            processes.extend(declared.into_iter().map(|p| (name.clone(), p)));
            names.push(name);
        }

        let mut env = Environment::with_store(start, calendar, StateStore::with_policy(policy));
        let offsets = stagger_offsets(processes.len());
        for ((owner, process), offset) in processes.into_iter().zip(offsets) {
            env.schedule_after(owner, process, offset)?;
        }

        info!(
            start = %start,
            timezone = %calendar,
            entities = names.len(),
            processes = env.process_count(),
            "simulation assembled"
        );
        Ok(Self { env, entities: names })
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until the absolute time `until`.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`] if `until` is before now or is a calendar time
    ///   in another timezone; nothing runs in that case.
    /// - Any process failure, which aborts the run.
    pub fn run(&mut self, until: impl Into<Until>, sink: &mut dyn ObservationSink) -> SimResult<()> {
        let until = match until.into() {
            Until::Tick(t) => t,
            Until::DateTime(dt) => self
                .env
                .calendar()
                .to_tick(&dt)
                .map_err(|e| SimError::Config(e.to_string()))?,
        };
        let now = self.env.now();
        if until < now {
            return Err(SimError::Config(format!("cannot run backward from {now} to {until}")));
        }
        if SimInstant::checked_at_tick(until).is_none() {
            return Err(SimError::Config(format!("run target {until} is beyond the representable clock range")));
        }

        info!(from = %now, %until, "run");
        self.env.run(until, sink)?;
        sink.on_run_end(self.env.now());
        Ok(())
    }

    /// Run for `duration` ticks (or a calendar span) from now.
    pub fn run_for(&mut self, duration: impl Into<RunDuration>, sink: &mut dyn ObservationSink) -> SimResult<()> {
        let ticks = match duration.into() {
            RunDuration::Ticks(n) => n,
            RunDuration::Span(d) => Calendar::span_to_ticks(d),
        };
        if ticks < 0 {
            return Err(SimError::Config(format!("run duration must be >= 0, got {ticks}")));
        }
        let now = self.env.now();
        let until = now.checked_add(ticks).ok_or_else(|| {
            SimError::Config(format!("running {ticks} ticks from {now} overflows the clock"))
        })?;
        self.run(Until::Tick(until), sink)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn now(&self) -> Tick {
        self.env.now()
    }

    pub fn datetime(&self) -> SimResult<DateTime<Tz>> {
        self.env.datetime()
    }

    pub fn calendar(&self) -> &Calendar {
        self.env.calendar()
    }

    /// Calendar time → tick in the run's timezone.
    pub fn to_tick(&self, dt: &DateTime<Tz>) -> SimResult<Tick> {
        Ok(self.env.calendar().to_tick(dt)?)
    }

    pub fn to_datetime(&self, tick: Tick) -> SimResult<DateTime<Tz>> {
        Ok(self.env.calendar().to_datetime(tick)?)
    }

    pub fn store(&self) -> &StateStore {
        self.env.store()
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        self.env.store_mut()
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Entity names in registration order.
    pub fn entity_names(&self) -> &[String] {
        &self.entities
    }
}

impl std::fmt::Debug for SimulationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRunner")
            .field("now", &self.env.now())
            .field("calendar", self.env.calendar())
            .field("entities", &self.entities)
            .field("pending", &self.env.pending())
            .finish()
    }
}
