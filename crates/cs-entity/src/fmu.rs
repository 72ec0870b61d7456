//! `FmuEntity` — drives an external co-simulation engine on the shared clock.
//!
//! # Process loop
//!
//! ```text
//! start:  engine.initialize(start_values, step_size, now)
//!         publish engine.read_outputs()        → <ns>:outputs
//! loop:   inputs  = store.flatten(<ns>:inputs)
//!         outputs = engine.advance(now + simulation_step, inputs)
//!         sleep(engine.current_time() - now)   // may overshoot
//!         publish outputs                      → <ns>:outputs
//! ```
//!
//! The engine's native step size and the simulation's synchronisation step
//! are independent: sleeping for the span the engine actually advanced keeps
//! the shared clock aligned with the engine clock.

use cs_core::{Tick, ValueMap};
use cs_store::make_namespace;
use tracing::debug;

use crate::{
    CoSimEngine, Entity, EntityEnv, Process, ProcessContext, ProcessError, ProcessResult, Step,
};

/// Entity wrapping one [`CoSimEngine`].
///
/// ```rust,ignore
/// let fmu = FmuEntity::new("C", engine, 15, 60)
///     .start_values(start)
///     .input_namespace("in");
/// ```
pub struct FmuEntity<E> {
    name:             String,
    engine:           E,
    start_values:     ValueMap,
    step_size:        i64,
    simulation_step:  i64,
    namespace:        Option<String>,
    input_namespace:  String,
    output_namespace: String,
}

impl<E: CoSimEngine> FmuEntity<E> {
    /// `step_size` is the engine's native step, `simulation_step` the span
    /// between synchronisations with the store.  Both must be `> 0`; this is
    /// checked when the entity is initialised.
    pub fn new(name: impl Into<String>, engine: E, step_size: i64, simulation_step: i64) -> Self {
        Self {
            name: name.into(),
            engine,
            start_values: ValueMap::new(),
            step_size,
            simulation_step,
            namespace: None,
            input_namespace: "inputs".to_owned(),
            output_namespace: "outputs".to_owned(),
        }
    }

    pub fn start_values(mut self, values: ValueMap) -> Self {
        self.start_values = values;
        self
    }

    /// Root namespace for inputs and outputs.  Default: the entity name.
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    pub fn input_namespace(mut self, ns: impl Into<String>) -> Self {
        self.input_namespace = ns.into();
        self
    }

    pub fn output_namespace(mut self, ns: impl Into<String>) -> Self {
        self.output_namespace = ns.into();
        self
    }

    fn root(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.name)
    }

    /// Fully-qualified input namespace (`"C:inputs"`).
    pub fn inputs_key(&self) -> String {
        make_namespace([self.root(), self.input_namespace.as_str()])
    }

    /// Fully-qualified output namespace (`"C:outputs"`).
    pub fn outputs_key(&self) -> String {
        make_namespace([self.root(), self.output_namespace.as_str()])
    }
}

impl<E: CoSimEngine + 'static> Entity for FmuEntity<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
        if self.step_size <= 0 {
            return Err(ProcessError::Config(format!(
                "{}: engine step size must be > 0, got {}",
                self.name, self.step_size
            )));
        }
        if self.simulation_step <= 0 {
            return Err(ProcessError::Config(format!(
                "{}: simulation step must be > 0, got {}",
                self.name, self.simulation_step
            )));
        }
        let this = *self;
        let process = FmuProcess {
            inputs:          this.inputs_key(),
            outputs:         this.outputs_key(),
            engine:          this.engine,
            start_values:    this.start_values,
            step_size:       this.step_size,
            simulation_step: this.simulation_step,
            started:         false,
            pending:         None,
        };
        Ok(vec![Box::new(process)])
    }
}

// ── Process ───────────────────────────────────────────────────────────────────

struct FmuProcess<E> {
    engine:          E,
    start_values:    ValueMap,
    step_size:       i64,
    simulation_step: i64,
    inputs:          String,
    outputs:         String,
    started:         bool,
    /// Outputs of the last `advance`, published when the wait ends.
    pending:         Option<ValueMap>,
}

impl<E: CoSimEngine> FmuProcess<E> {
    fn publish(&self, ctx: &mut ProcessContext<'_>, outputs: ValueMap) -> ProcessResult<()> {
        debug!(entity = ctx.owner(), t = %ctx.now(), ?outputs, "engine outputs");
        ctx.store_mut().set(Some(self.outputs.as_str()), outputs)?;
        Ok(())
    }
}

impl<E: CoSimEngine> Process for FmuProcess<E> {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<Step> {
        let now = ctx.now();
        if !self.started {
            self.engine
                .initialize(&self.start_values, self.step_size, now)
                .map_err(ProcessError::Engine)?;
            let initial = self.engine.read_outputs().map_err(ProcessError::Engine)?;
            self.publish(ctx, initial)?;
            self.started = true;
        } else if let Some(outputs) = self.pending.take() {
            self.publish(ctx, outputs)?;
        }

        let inputs = ctx.store().flatten(Some(self.inputs.as_str()));
        debug!(entity = ctx.owner(), t = %now, ?inputs, "engine inputs");

        let until: Tick = now + self.simulation_step;
        let outputs = self.engine.advance(until, &inputs).map_err(ProcessError::Engine)?;
        let current = self.engine.current_time();
        if current <= now {
            return Err(ProcessError::EngineStalled { until, current });
        }
        self.pending = Some(outputs);
        Ok(Step::Sleep(current - now))
    }
}
