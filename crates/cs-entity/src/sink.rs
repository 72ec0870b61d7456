//! Observation sink — where entities record measurements.

use cs_core::{Tick, Value};

/// Append-only destination for observations.
///
/// The simulation calls [`store`][Self::store] zero or more times per tick
/// (through `ProcessContext::record`) and never reads anything back.
/// Passed to `SimulationRunner::run` the same way an observer is.
pub trait ObservationSink {
    fn store(&mut self, name: &str, value: &Value, tick: Tick);

    /// Called once at the end of every `run` / `run_for`.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// An [`ObservationSink`] that discards everything.
pub struct NullSink;

impl ObservationSink for NullSink {
    fn store(&mut self, _name: &str, _value: &Value, _tick: Tick) {}
}

impl<S: ObservationSink + ?Sized> ObservationSink for &mut S {
    fn store(&mut self, name: &str, value: &Value, tick: Tick) {
        (**self).store(name, value, tick);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        (**self).on_run_end(final_tick);
    }
}
