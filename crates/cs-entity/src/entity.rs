//! The `Entity` trait.

use chrono::DateTime;
use cs_core::{Calendar, Tick, Tz};

use crate::{Process, ProcessResult};

/// What an entity may look at while declaring its processes.
#[derive(Copy, Clone, Debug)]
pub struct EntityEnv {
    /// Simulated time at which the processes will start.
    pub start:    Tick,
    pub calendar: Calendar,
}

impl EntityEnv {
    pub fn new(start: Tick, calendar: Calendar) -> Self {
        Self { start, calendar }
    }

    pub fn start_datetime(&self) -> ProcessResult<DateTime<Tz>> {
        Ok(self.calendar.to_datetime(self.start)?)
    }
}

/// A named participant in the simulation.
///
/// The runner calls [`initialize`][Self::initialize] exactly once, in
/// registration order, and schedules the returned processes.  Zero processes
/// is legal (a pure state holder).  The name is unique per run and is the
/// conventional root namespace for the entity's keys.
///
/// # Example
///
/// ```rust,ignore
/// struct Heartbeat;
///
/// impl Entity for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
///         let beat = every(Interval::seconds(1)?, |ctx: &mut ProcessContext<'_>| {
///             let now = ctx.now().0;
///             ctx.store_mut().insert("heartbeat:t", now)?;
///             Ok(())
///         });
///         Ok(vec![Box::new(beat)])
///     }
/// }
/// ```
pub trait Entity {
    fn name(&self) -> &str;

    /// Consume the entity and hand back its processes.
    fn initialize(self: Box<Self>, env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>>;
}
