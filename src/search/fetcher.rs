//! HTTP fetcher for the business search endpoint
//!
//! This module handles every request the sweep makes:
//! - Building the HTTP client
//! - Enforcing the client-side scroll cap before anything is sent
//! - Classifying responses into a `PageOutcome`
//!
//! The `SearchApi` trait is the seam between pagination and the network, so
//! the loop can be driven by a scripted source in tests.

use crate::search::listing::{Listing, SearchResponse};
use crate::search::query::Query;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Why a single page request failed (other than rate limiting)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request to API failed with status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response body: {0}")]
    Decode(String),
}

/// Result of requesting one page
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// A non-empty page of listings
    Listings(Vec<Listing>),

    /// The API answered but had nothing more to return
    Exhausted,

    /// The offset would exceed the API's cap; no request was sent
    ScrollLimitReached,

    /// HTTP 429: the caller's quota is used up
    RateLimited,

    /// Any other failure
    Failed(FetchFailure),
}

/// A source of search result pages
#[allow(async_fn_in_trait)]
pub trait SearchApi {
    /// Performs the request for `query`. Never consulted for queries past the
    /// scroll cap; see [`fetch_page`].
    async fn search(&self, query: &Query) -> PageOutcome;
}

/// Fetches one page, refusing offsets past `max_offset` without calling `api`
pub async fn fetch_page<A: SearchApi>(api: &A, query: &Query, max_offset: u32) -> PageOutcome {
    if query.exceeds(max_offset) {
        tracing::debug!(
            "Offset {} exceeds scroll cap {}, not requesting",
            query.offset(),
            max_offset
        );
        return PageOutcome::ScrollLimitReached;
    }

    api.search(query).await
}

/// Builds the HTTP client used for API calls
///
/// No request timeout is set beyond the transport default.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("yelp-sweep/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .brotli(true)
        .build()
}

/// The live search API, authenticated with a bearer token
pub struct YelpClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl YelpClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SearchApi for YelpClient {
    async fn search(&self, query: &Query) -> PageOutcome {
        let params = [
            ("location", query.location_param()),
            ("categories", query.category.clone()),
            ("limit", query.page_size.to_string()),
            ("offset", query.offset().to_string()),
        ];

        let response = match self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.api_key)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PageOutcome::Failed(FetchFailure::Transport(e.to_string())),
        };

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("API rate limit response: {}", body);
            return PageOutcome::RateLimited;
        }

        if !status.is_success() {
            return PageOutcome::Failed(FetchFailure::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => decode_page(&body),
            Err(e) => PageOutcome::Failed(FetchFailure::Transport(e.to_string())),
        }
    }
}

/// Classifies a successful response body
///
/// A missing, null or empty `businesses` array ends pagination.
pub fn decode_page(body: &str) -> PageOutcome {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(SearchResponse {
            businesses: Some(listings),
        }) if !listings.is_empty() => PageOutcome::Listings(listings),
        Ok(_) => PageOutcome::Exhausted,
        Err(e) => PageOutcome::Failed(FetchFailure::Decode(e.to_string())),
    }
}
