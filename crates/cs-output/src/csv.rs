//! CSV output backend.
//!
//! Creates `observations.csv` in the configured output directory with the
//! header `name,tick,timestamp,value`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ObservationRow, OutputResult};

/// File name created inside the output directory.
pub const OBSERVATIONS_CSV: &str = "observations.csv";

/// Writes observations to one CSV file.
pub struct CsvWriter {
    observations: Writer<File>,
}

impl CsvWriter {
    /// Create (truncating) `observations.csv` in `dir` and write the header.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let mut observations = Writer::from_path(dir.join(OBSERVATIONS_CSV))?;
        observations.write_record(["name", "tick", "timestamp", "value"])?;
        Ok(Self { observations })
    }
}

impl OutputWriter for CsvWriter {
    fn write_observation(&mut self, row: &ObservationRow) -> OutputResult<()> {
        self.observations.write_record(&[
            row.name.as_str(),
            &row.tick.to_string(),
            row.timestamp.as_str(),
            &row.value.to_string(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.observations.flush()?;
        Ok(())
    }
}
