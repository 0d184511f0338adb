//! Search module for paginating the business search API
//!
//! This module contains the core sweep logic, including:
//! - HTTP fetching with the client-side scroll cap
//! - Listing decoding and row flattening
//! - The per-pair pagination and dedup loop
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod listing;
mod query;
mod scrape;

pub use coordinator::{run_sweep, Coordinator};
pub use fetcher::{
    build_http_client, decode_page, fetch_page, FetchFailure, PageOutcome, SearchApi, YelpClient,
};
pub use listing::{
    CategoryTitle, Coordinates, Listing, ListingLocation, OutputRecord, SearchResponse,
    SEARCH_TERM,
};
pub use query::{location_slug, Paging, Query};
pub use scrape::{scrape_pair, PairScrape, RateLimited};
