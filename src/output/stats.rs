//! Run statistics
//!
//! Collected by the coordinator while pairs are processed and printed once
//! the run ends.

use chrono::{DateTime, Utc};

/// Sweep statistics summary
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Identifier of the run's output folder
    pub run_id: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run stopped, if it has
    pub finished_at: Option<DateTime<Utc>>,

    /// Pairs whose pagination ended without a failure
    pub pairs_completed: u64,

    /// Pairs cut short by a failed request
    pub pairs_failed: u64,

    /// Rows written across all files
    pub rows_written: u64,

    /// Distinct listing ids seen
    pub unique_listings: u64,

    /// Successful API calls
    pub requests: u64,

    /// Whether the run was aborted by the API's rate limit
    pub rate_limited: bool,
}

impl RunStatistics {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            pairs_completed: 0,
            pairs_failed: 0,
            rows_written: 0,
            unique_listings: 0,
            requests: 0,
            rate_limited: false,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Sweep Statistics ===\n");

    println!("Run ID: {}", stats.run_id);
    println!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {} seconds", duration);
    }
    println!();

    println!("Pairs:");
    println!("  Completed: {}", stats.pairs_completed);
    println!("  Failed: {}", stats.pairs_failed);
    println!();

    println!("Listings:");
    println!("  Unique: {}", stats.unique_listings);
    println!("  Rows written: {}", stats.rows_written);
    println!();

    println!("Requests: {}", stats.requests);

    if stats.rate_limited {
        println!("\nRun aborted: API rate limit exceeded");
    }
}
