//! In-memory backend, for tests and for reading observations back mid-run.

use cs_core::{Tick, Value};

use crate::{ObservationRow, OutputResult, OutputWriter};

/// Keeps every row in a `Vec`, in write order.
#[derive(Debug, Default, Clone)]
pub struct MemoryWriter {
    rows: Vec<ObservationRow>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    /// `(tick, value)` pairs recorded under `name`, in write order.
    pub fn series(&self, name: &str) -> Vec<(Tick, &Value)> {
        self.rows
            .iter()
            .filter(|r| r.name == name)
            .map(|r| (Tick(r.tick), &r.value))
            .collect()
    }

    /// The latest value recorded under `name` at or before `tick`.
    pub fn last_value_at(&self, name: &str, tick: Tick) -> Option<&Value> {
        self.rows
            .iter()
            .filter(|r| r.name == name && r.tick <= tick.0)
            .max_by_key(|r| r.tick)
            .map(|r| &r.value)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

impl OutputWriter for MemoryWriter {
    fn write_observation(&mut self, row: &ObservationRow) -> OutputResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}
