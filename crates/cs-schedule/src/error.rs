use cs_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule configuration error: {0}")]
    Config(String),

    #[error("invalid cron {field} field {text:?}: {reason}")]
    InvalidCron {
        field:  &'static str,
        text:   String,
        reason: String,
    },

    /// The cron expression can never fire (e.g. February 30th).
    #[error("cron expression {0:?} has no matching time within the search horizon")]
    NoMatch(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
