//! `ObservationRecorder<W>` — bridges `ObservationSink` to an `OutputWriter`.

use cs_core::{Calendar, Tick, Value};
use cs_entity::ObservationSink;
use tracing::{debug, warn};

use crate::row::ObservationRow;
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`ObservationSink`] that writes every observation to any
/// [`OutputWriter`] backend and flushes at the end of each run.
///
/// Errors from the writer are stored internally because sink methods have no
/// return value.  After `run` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct ObservationRecorder<W: OutputWriter> {
    writer:     W,
    calendar:   Calendar,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> ObservationRecorder<W> {
    /// `calendar` renders the `timestamp` column; pass the runner's.
    pub fn new(writer: W, calendar: Calendar) -> Self {
        Self { writer, calendar, written: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Observations written successfully so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn row(&self, name: &str, value: &Value, tick: Tick) -> OutputResult<ObservationRow> {
        Ok(ObservationRow {
            name:      name.to_owned(),
            tick:      tick.0,
            timestamp: self.calendar.format(tick)?,
            value:     value.clone(),
        })
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "observation output failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> ObservationSink for ObservationRecorder<W> {
    fn store(&mut self, name: &str, value: &Value, tick: Tick) {
        let result = self.row(name, value, tick).and_then(|row| self.writer.write_observation(&row));
        if result.is_ok() {
            self.written += 1;
        }
        self.store_err(result);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        debug!(%final_tick, written = self.written, "flushing observations");
        let result = self.writer.flush();
        self.store_err(result);
    }
}
