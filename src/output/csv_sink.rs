//! Headerless CSV files, one per pair
//!
//! Layout: `<data-dir>/<run-id>/<location with spaces as '+'>/<category>.csv`

use crate::output::traits::{OutputResult, RecordSink};
use crate::search::{location_slug, OutputRecord};
use std::path::{Path, PathBuf};

pub struct CsvSink {
    run_dir: PathBuf,
}

impl CsvSink {
    /// Creates a sink writing under `data_dir/run_id`
    ///
    /// Nothing is created on disk until the first pair is written.
    pub fn new(data_dir: impl AsRef<Path>, run_id: &str) -> Self {
        Self {
            run_dir: data_dir.as_ref().join(run_id),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Path of the file for one pair
    pub fn pair_path(&self, category: &str, location: &str) -> PathBuf {
        self.run_dir
            .join(location_slug(location))
            .join(format!("{}.csv", category))
    }
}

impl RecordSink for CsvSink {
    fn write_pair(
        &mut self,
        category: &str,
        location: &str,
        records: &[OutputRecord],
    ) -> OutputResult<()> {
        let path = self.pair_path(category, location);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;

        for record in records {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;

        tracing::info!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }
}
