//! `cs-entity` — entities, their processes, and the contracts they consume.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`process`]  | `Process` trait, `Step`, `ProcessContext<'a>`                   |
//! | [`action`]   | `Action` trait (one firing of a periodic process)               |
//! | [`periodic`] | `Periodic<S, A>`, `every`, `cron`                               |
//! | [`entity`]   | `Entity` trait, `EntityEnv`                                     |
//! | [`sink`]     | `ObservationSink` trait, `NullSink`                             |
//! | [`engine`]   | `CoSimEngine` contract for external model engines               |
//! | [`fmu`]      | `FmuEntity` — steps a `CoSimEngine` against the shared clock    |
//! | [`generic`]  | `GenericProcess` — one action on any schedule                   |
//! | [`input`]    | `Input` — replays a time series into the store                  |
//! | [`observer`] | `StateObserver`, `Measurement` — samples store keys to the sink |
//! | [`error`]    | `ProcessError`, `ProcessResult<T>`                              |
//!
//! # Process protocol
//!
//! A process is a resumable state machine.  Each call to
//! [`Process::resume`] runs until the process would block and returns a
//! [`Step`]:
//!
//! ```text
//! Step::Sleep(n)  → resume again n whole ticks later (n == 0 yields once)
//! Step::Done      → never resume again
//! ```
//!
//! Everything between two resumptions is atomic with respect to the state
//! store: exactly one process runs at a time, so no locking is needed.
//! Entities never reference each other; all coupling goes through store keys.

pub mod action;
pub mod engine;
pub mod entity;
pub mod error;
pub mod fmu;
pub mod generic;
pub mod input;
pub mod observer;
pub mod periodic;
pub mod process;
pub mod sink;


pub use action::Action;
pub use engine::{CoSimEngine, EngineError};
pub use entity::{Entity, EntityEnv};
pub use error::{ProcessError, ProcessResult};
pub use fmu::FmuEntity;
pub use generic::GenericProcess;
pub use input::Input;
pub use observer::{Measurement, StateObserver};
pub use periodic::{Periodic, cron, every};
pub use process::{Process, ProcessContext, Step};
pub use sink::{NullSink, ObservationSink};
