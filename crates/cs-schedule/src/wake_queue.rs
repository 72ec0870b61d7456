//! `WakeQueue` — pending process resumptions ordered on the sub-tick axis.
//!
//! Processes that wait register the instant at which they resume next.  The
//! environment pops one entry at a time in (instant, insertion) order, so two
//! processes due at the same instant resume in the order they were queued.
//!
//! `BTreeMap` gives O(log W) push and pop where W is the number of distinct
//! pending instants.  With staggered processes W is at most the number of
//! live processes.

use std::collections::{BTreeMap, VecDeque};

use cs_core::{ProcessId, SimInstant};

/// Priority queue of instants → processes that must resume at that instant.
#[derive(Default, Debug)]
pub struct WakeQueue {
    inner: BTreeMap<SimInstant, VecDeque<ProcessId>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `process` to resume at `at`, after anything already queued
    /// for the same instant.
    pub fn push(&mut self, at: SimInstant, process: ProcessId) {
        self.inner.entry(at).or_default().push_back(process);
        self.total += 1;
    }

    /// Remove and return the earliest entry strictly before `limit`.
    ///
    /// Returns `None` when the queue is empty or its head is at or after
    /// `limit`; the head is left in place in that case.
    pub fn pop_before(&mut self, limit: SimInstant) -> Option<(SimInstant, ProcessId)> {
        let mut entry = self.inner.first_entry()?;
        let at = *entry.key();
        if at >= limit {
            return None;
        }
        let process = entry.get_mut().pop_front();
        if entry.get().is_empty() {
            entry.remove();
        }
        let process = process?;
        self.total -= 1;
        Some((at, process))
    }

    /// The earliest instant with at least one queued process.
    pub fn next_instant(&self) -> Option<SimInstant> {
        self.inner.keys().next().copied()
    }

    /// Total number of (instant, process) entries.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct instants with at least one queued process.
    pub fn instant_count(&self) -> usize {
        self.inner.len()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.total = 0;
    }
}
