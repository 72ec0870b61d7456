//! `cs-sim` — the clock and the runner that wires entities to it.
//!
//! # Event loop
//!
//! ```text
//! run(until):
//!   while queue head < until (sub-tick instant, then insertion order):
//!     ① pop (instant, process)      — time jumps to instant
//!     ② process.resume(ctx)         — reads/writes the StateStore
//!     ③ Sleep(n) → push instant + n ticks (phase kept)
//!       Done     → drop the process
//!   time = until
//! ```
//!
//! # Stagger
//!
//! All processes want to start "at tick 0".  The runner spreads them over
//! distinct sub-tick offsets in `[0.005, 0.995]` in registration order, and
//! because waits are whole ticks each process keeps its offset for the whole
//! run.  Processes due at the same tick therefore always resume in
//! registration order.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cs_sim::{SimBuilder, StartTime};
//! use cs_entity::NullSink;
//!
//! let mut sim = SimBuilder::new()
//!     .entity(writer)
//!     .entity(reader)
//!     .initial_time(StartTime::Tick(Tick(0)))
//!     .build()?;
//! sim.run_for(3_600, &mut NullSink)?;
//! ```

pub mod builder;
pub mod environment;
pub mod error;
pub mod runner;


pub use builder::SimBuilder;
pub use environment::Environment;
pub use error::{SimError, SimResult};
pub use runner::{RunDuration, SimulationRunner, StartTime, Until, stagger_offsets};
