//! `Input` — replays a time series of setpoints into the state store.
//!
//! # CSV format
//!
//! One row per key and time.  Rows sharing a timestamp are written together.
//!
//! ```csv
//! timestamp,key,value
//! 0,int_setpoint,3
//! 2021-01-01T00:02:00Z,bool_setpoint,true
//! 2021-01-01T00:02:00Z,real_setpoint,21.5
//! ```
//!
//! `timestamp` is unix seconds or RFC 3339; `value` is inferred with
//! [`Value::infer`] (bool, then integer, then float, else string).

use std::collections::{BTreeMap, VecDeque};
use std::io::Read;
use std::path::Path;

use chrono::DateTime;
use cs_core::{Tick, Value, ValueMap};
use serde::Deserialize;
use tracing::debug;

use crate::{Entity, EntityEnv, Process, ProcessContext, ProcessError, ProcessResult, Step};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct InputRecord {
    timestamp: String,
    key:       String,
    value:     String,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Writes each row's values into its namespace at the row's tick, then ends
/// after the last row.
///
/// Rows at or before the start tick are merged in time order and written
/// immediately, so the store starts from the latest known value of every key.
pub struct Input {
    name:      String,
    namespace: Option<String>,
    rows:      BTreeMap<Tick, ValueMap>,
}

impl Input {
    /// Build from `(tick, values)` rows in any order; rows at the same tick
    /// are merged, later ones winning per key.
    pub fn new<I>(name: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = (Tick, ValueMap)>,
    {
        let mut merged: BTreeMap<Tick, ValueMap> = BTreeMap::new();
        for (tick, values) in rows {
            merged.entry(tick).or_default().extend(values);
        }
        Self { name: name.into(), namespace: None, rows: merged }
    }

    /// A single key's time series.
    pub fn series<I, V>(name: impl Into<String>, key: &str, points: I) -> Self
    where
        I: IntoIterator<Item = (Tick, V)>,
        V: Into<Value>,
    {
        let rows = points
            .into_iter()
            .map(|(tick, v)| (tick, ValueMap::from([(key.to_owned(), v.into())])));
        Self::new(name, rows)
    }

    /// Load rows from a CSV file (see the module docs for the format).
    pub fn from_csv_path(name: impl Into<String>, path: &Path) -> ProcessResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(name, file)
    }

    /// Like [`from_csv_path`][Self::from_csv_path] but accepts any `Read`
    /// source.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> ProcessResult<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for result in csv_reader.deserialize::<InputRecord>() {
            let rec = result.map_err(|e| ProcessError::Parse(e.to_string()))?;
            let tick = parse_timestamp(&rec.timestamp)?;
            rows.push((tick, ValueMap::from([(rec.key.trim().to_owned(), Value::infer(&rec.value))])));
        }
        Ok(Self::new(name, rows))
    }

    /// Namespace the values are written under.  Default: the entity name.
    pub fn namespace(mut self, ns: impl Into<String>) -> Self {
        self.namespace = Some(ns.into());
        self
    }

    /// Number of distinct row times.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Entity for Input {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(self: Box<Self>, _env: &EntityEnv) -> ProcessResult<Vec<Box<dyn Process>>> {
        let this = *self;
        let process = InputProcess {
            namespace: this.namespace.unwrap_or(this.name),
            rows:      this.rows.into_iter().collect(),
        };
        Ok(vec![Box::new(process)])
    }
}

fn parse_timestamp(text: &str) -> ProcessResult<Tick> {
    let t = text.trim();
    if let Ok(secs) = t.parse::<i64>() {
        return Ok(Tick(secs));
    }
    DateTime::parse_from_rfc3339(t)
        .map(|dt| Tick(dt.timestamp()))
        .map_err(|e| ProcessError::Parse(format!("invalid timestamp {t:?}: {e}")))
}

// ── Process ───────────────────────────────────────────────────────────────────

struct InputProcess {
    namespace: String,
    rows:      VecDeque<(Tick, ValueMap)>,
}

impl Process for InputProcess {
    fn resume(&mut self, ctx: &mut ProcessContext<'_>) -> ProcessResult<Step> {
        let now = ctx.now();

        let mut due: Option<ValueMap> = None;
        while self.rows.front().is_some_and(|(t, _)| *t <= now) {
            let Some((_, values)) = self.rows.pop_front() else { break };
            due.get_or_insert_with(ValueMap::new).extend(values);
        }
        if let Some(values) = due {
            debug!(entity = ctx.owner(), t = %now, ?values, "input rows");
            ctx.store_mut().set(Some(self.namespace.as_str()), values)?;
        }

        Ok(match self.rows.front() {
            Some((t, _)) => Step::Sleep(*t - now),
            None => Step::Done,
        })
    }
}
