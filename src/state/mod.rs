//! State module for tracking sweep progress
//!
//! # Components
//!
//! - `RunState`: the dedup set and request counter shared by every pair of a run
//! - `Termination`: why a single pair's pagination stopped

mod run_state;
mod termination;

// Re-export main types
pub use run_state::{DedupSet, RequestCounter, RunState};
pub use termination::Termination;
