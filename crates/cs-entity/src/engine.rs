//! Contract for external co-simulation engines (FMU runtimes and the like).

use cs_core::{Tick, ValueMap};

/// Error type returned by engines; passed through to the caller untouched.
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// A numerical model stepped from outside.
///
/// # Contract
///
/// - [`advance`][Self::advance] never moves the engine clock backward and
///   returns once the clock has reached or passed `until`.  An engine whose
///   native step does not divide the requested span overshoots.
/// - [`current_time`][Self::current_time] is the engine clock after the
///   latest call.
///
/// How the engine is hosted (in-process, subprocess, remote service) is
/// invisible here.
pub trait CoSimEngine {
    fn initialize(&mut self, start_values: &ValueMap, step_size: i64, start_time: Tick) -> Result<(), EngineError>;

    /// Apply `inputs`, step until `until`, and return the outputs.
    fn advance(&mut self, until: Tick, inputs: &ValueMap) -> Result<ValueMap, EngineError>;

    /// Outputs at the current engine time without stepping.
    fn read_outputs(&self) -> Result<ValueMap, EngineError>;

    fn current_time(&self) -> Tick;

    /// Native step size in ticks.
    fn step_size(&self) -> i64;
}
