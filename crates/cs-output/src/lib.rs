//! `cs-output` — observation writers for the rust_cosim framework.
//!
//! Backends, one behind a Cargo feature:
//!
//! | Feature   | Backend  | Files created                           |
//! |-----------|----------|-----------------------------------------|
//! | *(none)*  | Memory   | —                                       |
//! | *(none)*  | CSV      | `observations.csv`                      |
//! | `sqlite`  | SQLite   | `observations.db` (table `observations`) |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`ObservationRecorder`], which implements `cs_entity::ObservationSink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use cs_output::{CsvWriter, ObservationRecorder};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut recorder = ObservationRecorder::new(writer, *sim.calendar());
//! sim.run_for(3_600, &mut recorder)?;
//! if let Some(e) = recorder.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod recorder;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use memory::MemoryWriter;
pub use recorder::ObservationRecorder;
pub use row::ObservationRow;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
