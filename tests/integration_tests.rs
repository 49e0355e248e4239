//! Integration tests using mock HTTP server
//!
//! Tests the full flow through the public API: config → client → HTTP
//! requests → rate limit memo → cursors and errors

use futures::TryStreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use urlscan::{
    ActionCategory, Client, ClientConfig, Error, Pro, RetryMode, ScanOptions, SearchOptions,
    Visibility, WaitOptions,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client(server: &MockServer, retry: RetryMode) -> Client {
    let config = ClientConfig::builder()
        .api_key("integration-key")
        .base_url(server.uri())
        .retry(retry)
        .build();
    Client::with_config(config).unwrap()
}

fn items(range: std::ops::Range<u64>) -> Vec<Value> {
    range
        .map(|i| json!({"_id": format!("id-{i}"), "sort": [i, format!("id-{i}")]}))
        .collect()
}

fn quota_headers(template: ResponseTemplate, action: &str, remaining: u64, reset: &str) -> ResponseTemplate {
    template
        .insert_header("X-Rate-Limit-Action", action)
        .insert_header("X-Rate-Limit-Remaining", remaining.to_string().as_str())
        .insert_header("X-Rate-Limit-Reset", reset)
        .insert_header("X-Rate-Limit-Limit", "1000")
}

/// Serves a fixed sequence of responses, repeating the last one
struct Sequence(Vec<ResponseTemplate>, std::sync::atomic::AtomicUsize);

impl Sequence {
    fn new(responses: Vec<ResponseTemplate>) -> Self {
        Self(responses, std::sync::atomic::AtomicUsize::new(0))
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.1.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.0[n.min(self.0.len() - 1)].clone()
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_client_from_yaml_config_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/quotas"))
        .and(wiremock::matchers::header("api-key", "yaml-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"limits": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_key: yaml-key\nbase_url: {}\ntimeout_seconds: 5\nretry: local",
        server.uri()
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(config.timeout(), Duration::from_secs(5));

    let quotas = Client::with_config(config).unwrap().get_quotas().await.unwrap();
    assert!(quotas["limits"].is_object());
}

#[test]
fn test_invalid_yaml_config_is_rejected() {
    let err = ClientConfig::from_yaml_str("base_url: not a url").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));

    let err = ClientConfig::from_yaml_str("timeout_seconds: [1, 2]").unwrap_err();
    assert!(matches!(err, Error::YamlParse(_)));
}

// ============================================================================
// Search Pagination
// ============================================================================

#[tokio::test]
async fn test_search_pages_through_results_with_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .and(wiremock::matchers::query_param_is_missing("search_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": items(0..3),
            "total": 7,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .and(query_param("search_after", "2,id-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": items(3..6),
            "total": 7,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, RetryMode::Local);
    let results: Vec<Value> = client
        .search(SearchOptions::new("page.domain:example.com").size(3).limit(5))
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(results[4]["_id"], "id-4");
}

#[tokio::test]
async fn test_search_ceiling_yields_every_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .respond_with(Sequence::new(vec![
            ResponseTemplate::new(200).set_body_json(json!({"results": items(0..10_000), "total": 10_000})),
            ResponseTemplate::new(200).set_body_json(json!({"results": items(10_000..10_001), "total": 10_000})),
            ResponseTemplate::new(200).set_body_json(json!({"results": [], "total": 10_000})),
        ]))
        .mount(&server)
        .await;

    let client = client(&server, RetryMode::Local);
    let results = client
        .search(SearchOptions::new("*").size(10_000))
        .collect_all()
        .await
        .unwrap();

    assert_eq!(results.len(), 10_001);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

// ============================================================================
// Rate Limits
// ============================================================================

#[tokio::test]
async fn test_exhausted_search_quota_blocks_other_search_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .respond_with(quota_headers(
            ResponseTemplate::new(200).set_body_json(json!({"results": items(0..1), "total": 1})),
            "search",
            0,
            "2099-01-01T00:00:00.000Z",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/result/abc/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, RetryMode::Local);
    client.search(SearchOptions::new("a")).collect_all().await.unwrap();

    let err = client
        .search(SearchOptions::new("b"))
        .collect_all()
        .await
        .unwrap_err();
    match err {
        Error::RateLimitRemaining { category, .. } => assert_eq!(category, ActionCategory::Search),
        other => panic!("Expected RateLimitRemaining, got {other:?}"),
    }

    // Other categories are unaffected
    client.get_result("abc").await.unwrap();
}

#[tokio::test]
async fn test_pro_shares_rate_limit_memo_with_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search/"))
        .respond_with(quota_headers(
            ResponseTemplate::new(200).set_body_json(json!({"results": [], "total": 0})),
            "search",
            0,
            "2099-01-01T00:00:00.000Z",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_key("integration-key")
        .base_url(server.uri())
        .build();
    let pro = Pro::with_config(config).unwrap();

    pro.client().search(SearchOptions::new("a")).collect_all().await.unwrap();
    let err = pro
        .client()
        .search(SearchOptions::new("a"))
        .collect_all()
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_rate_limited_error_carries_reset_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/result/abc/"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("X-Rate-Limit-Reset-After", "17")
                .set_body_json(json!({"message": "Rate limit exceeded", "status": 429})),
        )
        .mount(&server)
        .await;

    let err = client(&server, RetryMode::Local)
        .get_result("abc")
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(17)));
    match err {
        Error::RateLimited(e) => {
            assert_eq!(e.message, "Rate limit exceeded");
            assert!((e.reset_after - 17.0).abs() < f64::EPSILON);
        }
        other => panic!("Expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_automatic_retry_scan_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scan/"))
        .respond_with(Sequence::new(vec![
            ResponseTemplate::new(429)
                .insert_header("X-Rate-Limit-Reset-After", "0")
                .set_body_json(json!({"message": "Rate limit exceeded", "status": 429})),
            ResponseTemplate::new(200).set_body_json(json!({
                "uuid": "scan-1",
                "visibility": "unlisted",
            })),
        ]))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/api/v1/result/scan-1/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/result/scan-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": {"uuid": "scan-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, RetryMode::Automatic);
    let wait = WaitOptions {
        initial_wait: None,
        ..WaitOptions::default()
    };
    let result = client
        .scan_and_get_result(
            "https://example.com",
            &ScanOptions::new(Visibility::Unlisted),
            &wait,
        )
        .await
        .unwrap();

    assert_eq!(result["task"]["uuid"], "scan-1");
    assert_eq!(client.http().rate_limit_retries(), 1);
}

// ============================================================================
// Scan Memo
// ============================================================================

#[tokio::test]
async fn test_second_wait_skips_initial_wait() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scan/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "scan-2",
            "visibility": "public",
        })))
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/api/v1/result/scan-2/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, RetryMode::Local);
    let wait = WaitOptions {
        initial_wait: Some(Duration::from_millis(300)),
        ..WaitOptions::default()
    };

    client
        .scan("https://example.com", &ScanOptions::default())
        .await
        .unwrap();
    assert!(client.pending_scan("scan-2").await);

    let started = std::time::Instant::now();
    client.wait_for_result("scan-2", &wait).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert!(!client.pending_scan("scan-2").await);

    let started = std::time::Instant::now();
    client.wait_for_result("scan-2", &wait).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(200));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_validation_error_exposes_item_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/scan/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation error",
            "status": 400,
            "type": "body",
            "errors": [{
                "title": "url must be a valid URL",
                "status": 400,
                "detail": "url: not-a-url",
            }],
        })))
        .mount(&server)
        .await;

    let err = client(&server, RetryMode::Local)
        .scan("not-a-url", &ScanOptions::default())
        .await
        .unwrap_err();

    let Error::Api(api) = err else {
        panic!("Expected Api error");
    };
    assert_eq!(api.kind.as_deref(), Some("body"));
    let errors = api.errors.unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "url must be a valid URL");
    assert_eq!(errors[0].status, 400);
    assert_eq!(errors[0].detail.as_deref(), Some("url: not-a-url"));
}

#[tokio::test]
async fn test_network_failure_is_not_retried() {
    let config = ClientConfig::builder()
        .api_key("integration-key")
        .base_url("http://127.0.0.1:1")
        .retry(RetryMode::Automatic)
        .timeout(Duration::from_secs(2))
        .build();
    let client = Client::with_config(config).unwrap();

    let err = client.get_result("abc").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(client.http().rate_limit_retries(), 0);
}
