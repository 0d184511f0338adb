//! Yelp-Sweep: a paginated business-listing harvester
//!
//! This crate walks the Yelp Fusion search endpoint for every configured
//! (category, location) pair, deduplicates listings across pages and pairs,
//! and writes one headerless CSV file per pair.

pub mod config;
pub mod output;
pub mod search;
pub mod state;

use thiserror::Error;

/// Main error type for Yelp-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("API rate limit exceeded after {requests} successful requests")]
    RateLimitExceeded { requests: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Yelp-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use search::{run_sweep, Coordinator, PageOutcome, Query};
pub use state::{DedupSet, RequestCounter, RunState};
