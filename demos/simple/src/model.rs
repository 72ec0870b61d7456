//! In-process stand-in for an FMU: a first-order integrator.
//!
//! Inputs:  `int_setpoint`, `real_setpoint`, `bool_setpoint`, `gain`
//! Outputs: `int_output` (= int_setpoint), `real_output` (the integral),
//!          `bool_output` (= bool_setpoint)
//!
//! Each native step integrates `gain * real_setpoint` over the step length in
//! hours, starting from the `y_start` start value.

use cs_core::{Tick, Value, ValueMap};
use cs_entity::{CoSimEngine, EngineError};

#[derive(Debug, Default)]
pub struct Integrator {
    time:    Tick,
    step:    i64,
    y:       f64,
    int_sp:  i64,
    bool_sp: bool,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }
}

fn real(inputs: &ValueMap, key: &str, default: f64) -> f64 {
    inputs.get(key).and_then(Value::as_f64).unwrap_or(default)
}

impl CoSimEngine for Integrator {
    fn initialize(&mut self, start_values: &ValueMap, step_size: i64, start_time: Tick) -> Result<(), EngineError> {
        if step_size <= 0 {
            return Err(format!("integrator step must be > 0, got {step_size}").into());
        }
        self.time = start_time;
        self.step = step_size;
        self.y = real(start_values, "y_start", 0.0);
        Ok(())
    }

    fn advance(&mut self, until: Tick, inputs: &ValueMap) -> Result<ValueMap, EngineError> {
        let setpoint = real(inputs, "real_setpoint", 0.0);
        let gain = real(inputs, "gain", 1.0);
        self.int_sp = inputs.get("int_setpoint").and_then(Value::as_i64).unwrap_or(self.int_sp);
        self.bool_sp = inputs.get("bool_setpoint").and_then(Value::as_bool).unwrap_or(self.bool_sp);

        let dt_hours = self.step as f64 / 3_600.0;
        while self.time < until {
            self.y += gain * setpoint * dt_hours;
            self.time = self.time + self.step;
        }
        self.read_outputs()
    }

    fn read_outputs(&self) -> Result<ValueMap, EngineError> {
        Ok(ValueMap::from([
            ("int_output".to_owned(), Value::Int(self.int_sp)),
            ("real_output".to_owned(), Value::Float(self.y)),
            ("bool_output".to_owned(), Value::Bool(self.bool_sp)),
        ]))
    }

    fn current_time(&self) -> Tick {
        self.time
    }

    fn step_size(&self) -> i64 {
        self.step
    }
}
