//! `cs-schedule` — when things happen.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`schedule`]   | `Schedule` trait (last fire → next fire)                 |
//! | [`interval`]   | `Interval` fixed-period schedule                         |
//! | [`cron`]       | `CronSchedule`, `CronBuilder` five-field cron schedule   |
//! | [`wake_queue`] | `WakeQueue` (`BTreeMap<SimInstant, VecDeque<ProcessId>>`) |
//! | [`error`]      | `ScheduleError`, `ScheduleResult<T>`                     |
//!
//! # Schedule model (summary)
//!
//! A schedule is a pure function of the last fire time:
//!
//! ```text
//! first  = schedule.first_fire(start)      // may equal start
//! next_k = schedule.next_fire(next_{k-1})  // always > next_{k-1}
//! ```
//!
//! Strictly increasing fire times guarantee forward progress.  Ties between
//! independent schedules that land on the same tick are not resolved here;
//! the `WakeQueue` orders them by sub-tick instant and insertion order.

pub mod cron;
pub mod error;
pub mod interval;
pub mod schedule;
pub mod wake_queue;

#[cfg(test)]
mod tests;

pub use cron::{CronBuilder, CronSchedule};
pub use error::{ScheduleError, ScheduleResult};
pub use interval::Interval;
pub use schedule::Schedule;
pub use wake_queue::WakeQueue;
