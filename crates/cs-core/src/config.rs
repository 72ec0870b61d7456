//! Run configuration.
//!
//! Typically loaded from a TOML file by the application crate (enable the
//! `serde` feature) and turned into a calendar plus start tick before the
//! runner is built.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::{Calendar, CoreError, CoreResult, Tick};

/// Where a run starts: a raw tick or a calendar time as text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum StartAt {
    /// Unix seconds (or any integer epoch).
    Unix(i64),
    /// RFC 3339 (`2021-01-01T00:00:00Z`) or a naive `YYYY-MM-DDTHH:MM:SS`
    /// interpreted in the run timezone.
    Text(String),
}

impl Default for StartAt {
    fn default() -> Self {
        StartAt::Unix(0)
    }
}

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RunConfig {
    /// Start of the run.
    pub start: StartAt,

    /// IANA timezone name of the run.  Default: `"UTC"`.
    pub timezone: String,

    /// Simulated seconds to run for.
    pub duration_secs: i64,

    /// Master seed for entity RNGs.  The same seed always produces identical
    /// traces.
    pub seed: u64,

    /// Directory for observation output.  `None` keeps observations in
    /// memory only.
    pub output_dir: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start:         StartAt::default(),
            timezone:      "UTC".to_owned(),
            duration_secs: 3_600,
            seed:          42,
            output_dir:    None,
        }
    }
}

impl RunConfig {
    /// Calendar for the configured timezone.
    pub fn calendar(&self) -> CoreResult<Calendar> {
        Calendar::from_name(&self.timezone)
    }

    /// Resolve `start` to a tick.
    ///
    /// An RFC 3339 start carries its own offset and is converted directly; a
    /// naive start is read as wall time in the configured timezone.
    pub fn start_tick(&self) -> CoreResult<Tick> {
        let text = match &self.start {
            StartAt::Unix(secs) => return Ok(Tick(*secs)),
            StartAt::Text(text) => text.trim(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Tick(dt.timestamp()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
            let calendar = self.calendar()?;
            return calendar.local_to_tick(&naive).ok_or_else(|| {
                CoreError::Config(format!("start {text:?} does not exist in timezone {calendar}"))
            });
        }
        text.parse::<i64>().map(Tick).map_err(|_| {
            CoreError::Config(format!(
                "start {text:?} is neither RFC 3339, YYYY-MM-DDTHH:MM:SS, nor unix seconds"
            ))
        })
    }

    /// The start as a calendar time in the run timezone.
    pub fn start_datetime(&self) -> CoreResult<DateTime<Tz>> {
        self.calendar()?.to_datetime(self.start_tick()?)
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> CoreResult<()> {
        if self.duration_secs < 0 {
            return Err(CoreError::Config(format!(
                "duration_secs must be >= 0, got {}",
                self.duration_secs
            )));
        }
        self.start_datetime().map(|_| ())
    }
}
