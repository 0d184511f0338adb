//! Sweep coordinator - drives every (category, location) pair of a run
//!
//! Pairs are processed one after another. The dedup set and request counter
//! live in a single `RunState` owned by the coordinator and carried from pair
//! to pair. Each pair's records are handed to the sink once its pagination
//! ends; a rate-limited response stops the run before any further pair.

use crate::config::Config;
use crate::output::{generate_run_id, CsvSink, RecordSink, RunStatistics};
use crate::search::fetcher::{build_http_client, SearchApi, YelpClient};
use crate::search::query::Paging;
use crate::search::scrape::scrape_pair;
use crate::state::RunState;
use crate::SweepError;

/// Main sweep coordinator structure
pub struct Coordinator<A, S> {
    api: A,
    sink: S,
    paging: Paging,
    pairs: Vec<(String, String)>,
    state: RunState,
    stats: RunStatistics,
}

impl<A: SearchApi, S: RecordSink> Coordinator<A, S> {
    /// Creates a coordinator with fresh run state
    ///
    /// # Arguments
    ///
    /// * `api` - Source of search result pages
    /// * `sink` - Destination for each pair's records
    /// * `paging` - Page size and scroll cap
    /// * `pairs` - (category, location) pairs in processing order
    /// * `run_id` - Identifier reported in the run statistics
    pub fn new(
        api: A,
        sink: S,
        paging: Paging,
        pairs: Vec<(String, String)>,
        run_id: &str,
    ) -> Self {
        Self {
            api,
            sink,
            paging,
            pairs,
            state: RunState::new(),
            stats: RunStatistics::new(run_id),
        }
    }

    /// Runs every pair in order
    ///
    /// # Returns
    ///
    /// * `Ok(RunStatistics)` - All pairs were attempted
    /// * `Err(SweepError::RateLimitExceeded)` - The API returned 429; later
    ///   pairs were skipped and the current pair's records were not written
    /// * `Err(SweepError::Output)` - A pair's records could not be written
    pub async fn run(&mut self) -> Result<RunStatistics, SweepError> {
        tracing::info!(
            "Starting sweep {} over {} pairs",
            self.stats.run_id,
            self.pairs.len()
        );

        for (category, location) in &self.pairs {
            let scraped = scrape_pair(
                &self.api,
                self.paging,
                category,
                location,
                &mut self.state.seen,
            )
            .await;

            let scrape = match scraped {
                Ok(scrape) => scrape,
                Err(limited) => {
                    self.state.requests.add(limited.requests_made);
                    tracing::error!(
                        "API rate limit exceeded while processing {} in {}; stopping",
                        category,
                        location
                    );
                    tracing::info!("Request count: {}", self.state.requests.get());

                    self.stats.rate_limited = true;
                    sync_statistics(&mut self.stats, &self.state);
                    self.stats.finish();
                    tracing::info!(
                        "Sweep {} aborted: {} unique listings, {} rows written",
                        self.stats.run_id,
                        self.stats.unique_listings,
                        self.stats.rows_written
                    );

                    return Err(SweepError::RateLimitExceeded {
                        requests: self.state.requests.get(),
                    });
                }
            };

            self.state.requests.add(scrape.requests_made);

            if scrape.termination.is_success() {
                self.stats.pairs_completed += 1;
            } else {
                self.stats.pairs_failed += 1;
                tracing::warn!(
                    "Pair {} in {} ended early ({}); keeping {} records",
                    category,
                    location,
                    scrape.termination,
                    scrape.records.len()
                );
            }

            self.sink.write_pair(category, location, &scrape.records)?;
            self.stats.rows_written += scrape.records.len() as u64;

            tracing::info!("Request count: {}", self.state.requests.get());
        }

        sync_statistics(&mut self.stats, &self.state);
        self.stats.finish();

        tracing::info!(
            "Sweep {} complete: {} unique listings, {} requests",
            self.stats.run_id,
            self.stats.unique_listings,
            self.stats.requests
        );

        Ok(self.stats.clone())
    }

    /// Dedup set and request counter as they stand
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Statistics gathered so far
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

fn sync_statistics(stats: &mut RunStatistics, state: &RunState) {
    stats.unique_listings = state.seen.len() as u64;
    stats.requests = state.requests.get();
}

/// Runs a complete sweep against the live API
///
/// Builds the HTTP client, picks a run id and writes CSV files under
/// `config.output.data_dir`.
///
/// # Arguments
///
/// * `config` - Validated configuration with at least one pair
/// * `api_key` - Bearer token for the search API
pub async fn run_sweep(config: &Config, api_key: &str) -> Result<RunStatistics, SweepError> {
    let client = build_http_client()?;
    let api = YelpClient::new(client, config.api.endpoint.clone(), api_key);

    let run_id = generate_run_id();
    let sink = CsvSink::new(&config.output.data_dir, &run_id);
    tracing::info!("Writing results under {}", sink.run_dir().display());

    let mut coordinator = Coordinator::new(
        api,
        sink,
        Paging::from(&config.api),
        config.pairs(),
        &run_id,
    );

    coordinator.run().await
}
