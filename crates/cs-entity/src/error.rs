use cs_core::{CoreError, Tick};
use cs_schedule::ScheduleError;
use cs_store::StoreError;
use thiserror::Error;

use crate::EngineError;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("entity configuration error: {0}")]
    Config(String),

    /// Raised by the wrapped co-simulation engine; carried unchanged.
    #[error("co-simulation engine error: {0}")]
    Engine(#[source] EngineError),

    #[error("engine did not advance: asked for {until}, clock stayed at {current}")]
    EngineStalled { until: Tick, current: Tick },

    #[error("input data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ProcessResult<T> = Result<T, ProcessError>;
