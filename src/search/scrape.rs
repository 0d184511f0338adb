//! Pagination loop for a single (category, location) pair

use crate::search::fetcher::{fetch_page, PageOutcome, SearchApi};
use crate::search::listing::OutputRecord;
use crate::search::query::{Paging, Query};
use crate::state::{DedupSet, Termination};
use thiserror::Error;

/// Records gathered for one pair, plus how the loop ended
#[derive(Debug, Clone)]
pub struct PairScrape {
    pub category: String,
    pub location: String,
    /// New listings in first-seen order
    pub records: Vec<OutputRecord>,
    /// Successful API calls, including the final empty page
    pub requests_made: u64,
    pub termination: Termination,
}

/// The API answered 429; the whole run has to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("API rate limit exceeded after {requests_made} requests for this pair")]
pub struct RateLimited {
    /// Successful calls made for this pair before the 429
    pub requests_made: u64,
}

/// Pages through the search results for one pair until the API runs dry,
/// the scroll cap is hit, or a request fails.
///
/// Listings whose id is already in `seen` are dropped silently; new ids are
/// added to it. On rate limiting the records gathered for this pair are
/// discarded and `RateLimited` is returned.
pub async fn scrape_pair<A: SearchApi>(
    api: &A,
    paging: Paging,
    category: &str,
    location: &str,
    seen: &mut DedupSet,
) -> Result<PairScrape, RateLimited> {
    tracing::info!("Category: {} in location: {}", category, location);

    let mut query = Query::first_page(category, location, paging.page_size);
    let mut records = Vec::new();
    let mut requests_made = 0u64;

    let termination = loop {
        let listings = match fetch_page(api, &query, paging.max_offset).await {
            PageOutcome::ScrollLimitReached => break Termination::ScrollLimitReached,
            PageOutcome::RateLimited => return Err(RateLimited { requests_made }),
            PageOutcome::Failed(failure) => {
                tracing::error!(
                    "Request for {} in {} (offset {}) failed: {}",
                    category,
                    location,
                    query.offset(),
                    failure
                );
                break Termination::Failed(failure.to_string());
            }
            PageOutcome::Exhausted => {
                requests_made += 1;
                tracing::debug!("Items returned from API: 0");
                break Termination::Exhausted;
            }
            PageOutcome::Listings(listings) => {
                requests_made += 1;
                listings
            }
        };

        tracing::debug!("Items returned from API: {}", listings.len());

        for listing in &listings {
            if seen.insert(&listing.id) {
                records.push(OutputRecord::from(listing));
            }
        }

        tracing::info!("Unique items found: {}", seen.len());

        query = query.next_page();
    };

    tracing::debug!(
        "Finished {} in {}: {} ({} records, {} requests)",
        category,
        location,
        termination,
        records.len(),
        requests_made
    );

    Ok(PairScrape {
        category: category.to_string(),
        location: location.to_string(),
        records,
        requests_made,
        termination,
    })
}
