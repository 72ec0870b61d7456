use cs_core::{CoreError, ProcessId};
use cs_entity::ProcessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A process asked to wait a negative (or non-finite) time.
    #[error("{process} of entity {entity:?} requested invalid delay {delay}")]
    InvalidDelay {
        entity:  String,
        process: ProcessId,
        delay:   f64,
    },

    /// A process failed; the run is aborted.
    #[error("process of entity {entity:?} failed: {source}")]
    Process {
        entity: String,
        #[source]
        source: ProcessError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;
