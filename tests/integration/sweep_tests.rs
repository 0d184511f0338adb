//! Integration tests for the sweep
//!
//! These tests use wiremock to stand in for the business search API and run
//! the fetcher, pagination loop and coordinator end-to-end.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use yelp_sweep::config::{ApiConfig, Config, OutputConfig, SearchConfig};
use yelp_sweep::output::{OutputResult, RecordSink};
use yelp_sweep::search::{
    build_http_client, run_sweep, Coordinator, FetchFailure, OutputRecord, PageOutcome, Paging,
    Query, SearchApi, YelpClient,
};
use yelp_sweep::SweepError;

const SEARCH_PATH: &str = "/v3/businesses/search";

fn business(id: &str) -> Value {
    json!({
        "id": id,
        "alias": format!("{}-alias", id),
        "name": format!("Business {}", id),
        "rating": 4.0,
        "review_count": 12,
        "price": "$$",
        "phone": "+12065550100",
        "categories": [{"alias": "bars", "title": "Bars"}, {"alias": "pubs", "title": "Pubs"}],
        "coordinates": {"latitude": 47.6062, "longitude": -122.3321},
        "location": {
            "city": "Seattle",
            "state": "WA",
            "zip_code": "98101",
            "display_address": ["1 Pike St", "Seattle, WA 98101"]
        },
        "url": format!("https://www.yelp.com/biz/{}", id)
    })
}

fn page_body(ids: impl IntoIterator<Item = String>) -> Value {
    let businesses: Vec<Value> = ids.into_iter().map(|id| business(&id)).collect();
    json!({"businesses": businesses, "total": 1000})
}

/// Serves `pages` full pages keyed by the `offset` parameter, then empty pages
struct OffsetPages {
    pages: usize,
    page_size: usize,
    prefix: &'static str,
}

impl Respond for OffsetPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let offset: usize = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "offset")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(0);

        if offset / self.page_size >= self.pages {
            return ResponseTemplate::new(200).set_body_json(json!({"businesses": [], "total": 0}));
        }

        let ids = (offset..offset + self.page_size).map(|i| format!("{}-{}", self.prefix, i));
        ResponseTemplate::new(200).set_body_json(page_body(ids))
    }
}

fn test_config(server: &MockServer, data_dir: &Path, categories: &[&str], locations: &[&str]) -> Config {
    Config {
        api: ApiConfig {
            endpoint: format!("{}{}", server.uri(), SEARCH_PATH),
            ..ApiConfig::default()
        },
        output: OutputConfig {
            data_dir: data_dir.display().to_string(),
        },
        search: SearchConfig {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn test_client(server: &MockServer) -> YelpClient {
    let client = build_http_client().expect("Failed to build client");
    YelpClient::new(client, format!("{}{}", server.uri(), SEARCH_PATH), "test-key")
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open output file");
    reader
        .records()
        .map(|r| r.expect("Failed to read row"))
        .collect()
}

fn output_path(data_dir: &Path, run_id: &str, location: &str, category: &str) -> PathBuf {
    data_dir
        .join(run_id)
        .join(location.replace(' ', "+"))
        .join(format!("{}.csv", category))
}

/// Keeps written pairs in memory
#[derive(Default)]
struct MemorySink {
    written: Vec<(String, String, Vec<OutputRecord>)>,
}

impl RecordSink for MemorySink {
    fn write_pair(
        &mut self,
        category: &str,
        location: &str,
        records: &[OutputRecord],
    ) -> OutputResult<()> {
        self.written
            .push((category.to_string(), location.to_string(), records.to_vec()));
        Ok(())
    }
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter()
        .map(|(c, l)| (c.to_string(), l.to_string()))
        .collect()
}

#[tokio::test]
async fn test_two_full_pages_then_empty() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(OffsetPages {
            pages: 2,
            page_size: 50,
            prefix: "sea",
        })
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server, data_dir.path(), &["bars"], &["Seattle"]);
    let stats = run_sweep(&config, "test-key").await.expect("Sweep failed");

    assert_eq!(stats.requests, 3);
    assert_eq!(stats.unique_listings, 100);
    assert_eq!(stats.rows_written, 100);
    assert_eq!(stats.pairs_completed, 1);

    let file = output_path(data_dir.path(), &stats.run_id, "Seattle", "bars");
    let rows = read_rows(&file);
    assert_eq!(rows.len(), 100);

    let first = &rows[0];
    assert_eq!(first.len(), 16);
    assert_eq!(&first[0], "all");
    assert_eq!(&first[1], "sea-0");
    assert_eq!(&first[4], "4.0");
    assert_eq!(&first[8], "Bars,Pubs");
    assert_eq!(&first[11], "1 Pike St Seattle, WA 98101");
    assert_eq!(&rows[99][1], "sea-99");
}

#[tokio::test]
async fn test_overlapping_pages_are_deduplicated() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body((0..50).map(|i| format!("id-{}", i)))),
        )
        .mount(&mock_server)
        .await;

    // Ten of these ids (40..50) were already on the first page
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("offset", "50"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body((40..90).map(|i| format!("id-{}", i)))),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 90})))
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server, data_dir.path(), &["bars"], &["Seattle"]);
    let stats = run_sweep(&config, "test-key").await.expect("Sweep failed");

    assert_eq!(stats.unique_listings, 90);
    assert_eq!(stats.requests, 3);

    let rows = read_rows(&output_path(data_dir.path(), &stats.run_id, "Seattle", "bars"));
    assert_eq!(rows.len(), 90);

    let ids: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
    let expected: Vec<String> = (0..90).map(|i| format!("id-{}", i)).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_scroll_cap_limits_requests() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    // Offsets 0..=950 are requested; 1000 is past the cap and never sent
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(OffsetPages {
            pages: 100,
            page_size: 50,
            prefix: "deep",
        })
        .expect(20)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server, data_dir.path(), &["restaurants"], &["New York"]);
    let stats = run_sweep(&config, "test-key").await.expect("Sweep failed");

    assert_eq!(stats.requests, 20);
    assert_eq!(stats.unique_listings, 1000);
    assert_eq!(stats.pairs_completed, 1);

    let rows = read_rows(&output_path(
        data_dir.path(),
        &stats.run_id,
        "New York",
        "restaurants",
    ));
    assert_eq!(rows.len(), 1000);
}

#[tokio::test]
async fn test_dedup_persists_across_pairs() {
    let mock_server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();

    // Every location gets the same listings
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(OffsetPages {
            pages: 1,
            page_size: 50,
            prefix: "shared",
        })
        .mount(&mock_server)
        .await;

    let config = test_config(
        &mock_server,
        data_dir.path(),
        &["bars"],
        &["Seattle", "Bellevue"],
    );
    let stats = run_sweep(&config, "test-key").await.expect("Sweep failed");

    assert_eq!(stats.unique_listings, 50);
    assert_eq!(stats.requests, 4);
    assert_eq!(stats.pairs_completed, 2);

    let seattle = read_rows(&output_path(data_dir.path(), &stats.run_id, "Seattle", "bars"));
    let bellevue = read_rows(&output_path(data_dir.path(), &stats.run_id, "Bellevue", "bars"));
    assert_eq!(seattle.len(), 50);
    assert!(bellevue.is_empty());
}

#[tokio::test]
async fn test_rate_limit_stops_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "bars"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body((0..50).map(|i| format!("b-{}", i)))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "bars"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": "ACCESS_LIMIT_REACHED", "description": "You've reached the access limit for this client."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "coffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec!["c-0".to_string()])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut coordinator = Coordinator::new(
        test_client(&mock_server),
        MemorySink::default(),
        Paging::default(),
        pairs(&[("bars", "Seattle"), ("coffee", "Seattle")]),
        "100001",
    );

    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(SweepError::RateLimitExceeded { requests: 1 })
    ));
    assert_eq!(coordinator.state().requests.get(), 1);
    assert!(coordinator.sink().written.is_empty());
    assert!(coordinator.statistics().rate_limited);
}

#[tokio::test]
async fn test_rate_limit_after_completed_pairs_keeps_their_files() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("location", "Seattle"))
        .respond_with(OffsetPages {
            pages: 1,
            page_size: 50,
            prefix: "sea",
        })
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("location", "Tacoma"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let mut coordinator = Coordinator::new(
        test_client(&mock_server),
        MemorySink::default(),
        Paging::default(),
        pairs(&[("bars", "Seattle"), ("bars", "Tacoma"), ("bars", "Olympia")]),
        "100002",
    );

    let result = coordinator.run().await;

    assert!(matches!(
        result,
        Err(SweepError::RateLimitExceeded { requests: 2 })
    ));
    let written = &coordinator.sink().written;
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].1, "Seattle");
    assert_eq!(written[0].2.len(), 50);
}

#[tokio::test]
async fn test_request_failure_only_ends_current_pair() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "bars"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "bars"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body((0..50).map(|i| format!("b-{}", i)))),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("categories", "coffee"))
        .respond_with(OffsetPages {
            pages: 1,
            page_size: 50,
            prefix: "c",
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut coordinator = Coordinator::new(
        test_client(&mock_server),
        MemorySink::default(),
        Paging::default(),
        pairs(&[("bars", "Seattle"), ("coffee", "Seattle")]),
        "100003",
    );

    let stats = coordinator.run().await.expect("Sweep failed");

    // bars: one good page then a 500; coffee: one page then empty
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.pairs_failed, 1);
    assert_eq!(stats.pairs_completed, 1);
    assert_eq!(stats.unique_listings, 100);

    let written = &coordinator.sink().written;
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].0, "bars");
    assert_eq!(written[0].2.len(), 50);
    assert_eq!(written[1].0, "coffee");
    assert_eq!(written[1].2.len(), 50);
}

#[tokio::test]
async fn test_search_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("authorization", "Bearer secret-token"))
        .and(query_param("location", "New+York"))
        .and(query_param("categories", "bars"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec!["ny-1".to_string()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = build_http_client().unwrap();
    let api = YelpClient::new(
        client,
        format!("{}{}", mock_server.uri(), SEARCH_PATH),
        "secret-token",
    );
    let query = Query {
        category: "bars".to_string(),
        location: "New York".to_string(),
        page_size: 20,
        page_index: 2,
    };

    match api.search(&query).await {
        PageOutcome::Listings(listings) => {
            assert_eq!(listings.len(), 1);
            assert_eq!(listings[0].id, "ny-1");
        }
        other => panic!("expected listings, got {:?}", other),
    }
}

#[tokio::test]
async fn test_status_classification() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("categories", "limited"))
        .respond_with(ResponseTemplate::new(429).set_body_string("too many"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("categories", "broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("categories", "garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let api = test_client(&mock_server);

    let limited = api.search(&Query::first_page("limited", "Seattle", 50)).await;
    assert!(matches!(limited, PageOutcome::RateLimited));

    let broken = api.search(&Query::first_page("broken", "Seattle", 50)).await;
    assert!(matches!(
        broken,
        PageOutcome::Failed(FetchFailure::Status(503))
    ));

    let garbled = api.search(&Query::first_page("garbled", "Seattle", 50)).await;
    assert!(matches!(
        garbled,
        PageOutcome::Failed(FetchFailure::Decode(_))
    ));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_failure() {
    let client = build_http_client().unwrap();
    let api = YelpClient::new(client, "http://127.0.0.1:1/v3/businesses/search", "key");

    let outcome = api.search(&Query::first_page("bars", "Seattle", 50)).await;
    assert!(matches!(
        outcome,
        PageOutcome::Failed(FetchFailure::Transport(_))
    ));
}
