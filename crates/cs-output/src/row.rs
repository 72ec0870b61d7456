//! Plain data row written by output backends.

use cs_core::Value;

/// One recorded observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub name:      String,
    pub tick:      i64,
    /// RFC 3339 rendering of `tick` in the run's timezone.
    pub timestamp: String,
    pub value:     Value,
}
