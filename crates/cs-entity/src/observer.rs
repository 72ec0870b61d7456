//! `StateObserver` — periodically copies store values into the observation
//! sink.

use cs_schedule::Schedule;

use crate::{Action, Entity, EntityEnv, Periodic, Process, ProcessContext, ProcessResult};

/// One store key to sample, and the observation name to record it under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Measurement {
    pub key:      String,
    pub store_as: String,
}

impl Measurement {
    /// Record `key` under its own name.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self { store_as: key.clone(), key }
    }

    pub fn store_as(mut self, name: impl Into<String>) -> Self {
        self.store_as = name.into();
        self
    }
}

impl From<&str> for Measurement {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Samples its measurements on a schedule.  Keys not (yet) in the store are
/// skipped rather than recorded.
pub struct StateObserver<S> {
    name:         String,
    schedule:     S,
    measurements: Vec<Measurement>,
}

impl<S: Schedule + 'static> StateObserver<S> {
    pub fn new<I, M>(name: impl Into<String>, schedule: S, measurements: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Measurement>,
    {
        Self {
            name: name.into(),
            schedule,
            measurements: measurements.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Schedule + 'static> Entity for StateObserver<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
        let this = *self;
        let sample = Sample { measurements: this.measurements };
        Ok(vec![Box::new(Periodic::new(this.schedule, sample))])
    }
}

struct Sample {
    measurements: Vec<Measurement>,
}

impl Action for Sample {
    fn run(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<()> {
        for m in &self.measurements {
            if let Some(value) = ctx.store().get(&m.key).cloned() {
                ctx.record(&m.store_as, value);
            }
        }
        Ok(())
    }
}
