//! `cs-core` — foundational types for the `rust_cosim` co-simulation framework.
//!
//! This crate is a dependency of every other `cs-*` crate.  It has no `cs-*`
//! dependencies and few external ones (`chrono`/`chrono-tz` for the calendar,
//! `rand`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `ProcessId`                                              |
//! | [`time`]    | `Tick`, `SimInstant`, `Calendar`                         |
//! | [`value`]   | `Value` scalar, `ValueMap`                               |
//! | [`config`]  | `RunConfig`, `StartAt`                                   |
//! | [`rng`]     | `SimRng` (seeded per entity)                             |
//! | [`error`]   | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public data types.       |
//!           | Required to load `RunConfig` from TOML/JSON.               |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod value;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use chrono_tz::Tz;
pub use config::{RunConfig, StartAt};
pub use error::{CoreError, CoreResult};
pub use ids::ProcessId;
pub use rng::SimRng;
pub use time::{Calendar, SUBTICKS_PER_TICK, SimInstant, Tick};
pub use value::{Value, ValueMap};
