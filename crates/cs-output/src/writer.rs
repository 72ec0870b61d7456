//! The `OutputWriter` trait implemented by all backend writers.

use crate::{ObservationRow, OutputResult};

/// Trait implemented by the memory, CSV, and SQLite writers.
///
/// Errors are stored by [`ObservationRecorder`][crate::ObservationRecorder]
/// and retrieved with its `take_error`.
pub trait OutputWriter {
    fn write_observation(&mut self, row: &ObservationRow) -> OutputResult<()>;

    fn write_observations(&mut self, rows: &[ObservationRow]) -> OutputResult<()> {
        for row in rows {
            self.write_observation(row)?;
        }
        Ok(())
    }

    /// Push buffered rows to durable storage.  May be called after every
    /// run; writing can continue afterwards.
    fn flush(&mut self) -> OutputResult<()>;
}
