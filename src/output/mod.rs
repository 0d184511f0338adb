//! Output module for persisting listings and reporting run results
//!
//! This module handles:
//! - Writing each pair's listings as a headerless CSV file
//! - Generating the per-run folder identifier
//! - Recording and printing run statistics

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::CsvSink;
pub use stats::{print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};

use uuid::Uuid;

/// Length of the numeric run identifier
const RUN_ID_LEN: usize = 6;

/// Generates a short numeric identifier for a run's output folder
///
/// The first digits of a random UUID's integer value.
pub fn generate_run_id() -> String {
    Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .take(RUN_ID_LEN)
        .collect()
}
