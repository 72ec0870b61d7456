//! SQLite output backend (feature `sqlite`).
//!
//! Creates `observations.db` in the configured output directory with one
//! table, `observations`.  Values keep their SQLite storage class (integer,
//! real, text; booleans as 0/1) and a `kind` column (`Value::kind`) so reads
//! rebuild the original variant.

use std::path::Path;

use cs_core::{Tick, Value};
use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

use crate::writer::OutputWriter;
use crate::{ObservationRow, OutputResult};

/// File name created inside the output directory.
pub const OBSERVATIONS_DB: &str = "observations.db";

/// Writes observations to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open (or create) `observations.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(OBSERVATIONS_DB))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS observations (
                 name      TEXT    NOT NULL,
                 tick      INTEGER NOT NULL,
                 timestamp TEXT    NOT NULL,
                 kind      TEXT    NOT NULL,
                 value
             );
             CREATE INDEX IF NOT EXISTS observations_name_tick
                 ON observations (name, tick);",
        )?;

        Ok(Self { conn })
    }

    /// The latest value stored under `name` at or before `tick`.
    pub fn last_value_at(&self, name: &str, tick: Tick) -> OutputResult<Option<Value>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT kind, value FROM observations \
             WHERE name = ?1 AND tick <= ?2 \
             ORDER BY tick DESC, rowid DESC LIMIT 1",
        )?;
        let mut rows = stmt.query(rusqlite::params![name, tick.0])?;
        match rows.next()? {
            Some(row) => Ok(from_sql(&row.get::<_, String>(0)?, row.get::<_, SqlValue>(1)?)),
            None => Ok(None),
        }
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Int(n) => SqlValue::Integer(*n),
        Value::Float(x) => SqlValue::Real(*x),
        Value::Str(s) => SqlValue::Text(s.clone()),
    }
}

fn from_sql(kind: &str, value: SqlValue) -> Option<Value> {
    match (kind, value) {
        ("bool", SqlValue::Integer(n)) => Some(Value::Bool(n != 0)),
        (_, SqlValue::Integer(n)) => Some(Value::Int(n)),
        (_, SqlValue::Real(x)) => Some(Value::Float(x)),
        (_, SqlValue::Text(s)) => Some(Value::Str(s)),
        (_, SqlValue::Null | SqlValue::Blob(_)) => None,
    }
}

impl OutputWriter for SqliteWriter {
    fn write_observation(&mut self, row: &ObservationRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO observations (name, tick, timestamp, kind, value) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(rusqlite::params![row.name, row.tick, row.timestamp, row.value.kind(), to_sql(&row.value)])?;
        Ok(())
    }

    fn write_observations(&mut self, rows: &[ObservationRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO observations (name, tick, timestamp, kind, value) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.name, row.tick, row.timestamp, row.value.kind(), to_sql(&row.value)])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
