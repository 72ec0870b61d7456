//! Fluent builder for constructing a [`SimulationRunner`].

use cs_core::{RunConfig, Tz};
use cs_entity::Entity;
use cs_store::CollisionPolicy;

use crate::{SimulationRunner, SimResult, StartTime};

/// Fluent builder for [`SimulationRunner`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                        |
/// |-------------------------|--------------------------------|
/// | `.initial_time(t)`      | `StartTime::Tick(Tick(0))`     |
/// | `.timezone(tz)`         | `UTC`                          |
/// | `.collision_policy(p)`  | `CollisionPolicy::Overwrite`   |
///
/// Entities are initialised and staggered in the order they are added.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::from_config(&cfg)?
///     .entity(fmu)
///     .entity(observer)
///     .build()?;
/// sim.run_for(cfg.duration_secs, &mut recorder)?;
/// ```
#[derive(Default)]
pub struct SimBuilder {
    entities:     Vec<Box<dyn Entity>>,
    initial_time: StartTime,
    timezone:     Option<Tz>,
    policy:       CollisionPolicy,
}

impl SimBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start time and timezone taken from a validated [`RunConfig`].
    pub fn from_config(config: &RunConfig) -> SimResult<Self> {
        config.validate()?;
        let calendar = config.calendar()?;
        Ok(Self::new()
            .initial_time(config.start_tick()?)
            .timezone(calendar.timezone()))
    }

    pub fn entity(mut self, entity: impl Entity + 'static) -> Self {
        self.entities.push(Box::new(entity));
        self
    }

    pub fn entities<I>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Entity>>,
    {
        self.entities.extend(entities);
        self
    }

    pub fn initial_time(mut self, start: impl Into<StartTime>) -> Self {
        self.initial_time = start.into();
        self
    }

    pub fn timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz);
        self
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Initialise every entity and schedule its processes.
    pub fn build(self) -> SimResult<SimulationRunner> {
        SimulationRunner::assemble(
            self.entities,
            self.initial_time,
            self.timezone.unwrap_or(Tz::UTC),
            self.policy,
        )
    }
}
