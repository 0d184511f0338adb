//! Record sink trait and output error types

use crate::search::OutputRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the records of one (category, location) pair
///
/// Called once per pair, after that pair's pagination has finished. An empty
/// slice is still written so every processed pair leaves a file behind.
pub trait RecordSink {
    fn write_pair(
        &mut self,
        category: &str,
        location: &str,
        records: &[OutputRecord],
    ) -> OutputResult<()>;
}
