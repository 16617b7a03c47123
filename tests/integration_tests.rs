//! Integration tests using a mock HTTP server
//!
//! Exercise the full flow: API root + endpoint configuration → merged
//! requests on the wire → pagination following → logged exchanges.

use std::sync::Arc;
use std::time::Duration;

use apikit::{
    Api, AuthConfig, Endpoint, Error, FieldNextUrl, FieldResults, JsonValue, LogLevel,
    MemoryLogger, Method, RequestLayer, RetryPolicy,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn api_for(server: &MockServer) -> Arc<Api> {
    Arc::new(Api::builder(server.uri()).build().unwrap())
}

fn paginated(endpoint: Endpoint) -> Endpoint {
    endpoint
        .with_results(FieldResults::new("items"))
        .with_next_url(FieldNextUrl::new("next_page"))
}

// ============================================================================
// Fetch Basics
// ============================================================================

#[tokio::test]
async fn test_fetch_single_page_with_default_extractors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1, 2],
            "total": 2
        })))
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things").unwrap();
    let outcome = endpoint.fetch().await.unwrap();

    // Identity extractor keeps the whole body; no next URL means one page
    assert_eq!(outcome.results, Some(json!({"items": [1, 2], "total": 2})));
    assert_eq!(outcome.pages, 1);
    assert_eq!(outcome.exchange.request.method, reqwest::Method::GET);
    assert_eq!(outcome.exchange.request.url.path(), "/things");
    assert_eq!(outcome.exchange.response.status(), 200);
}

#[tokio::test]
async fn test_fetch_empty_initial_response_yields_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things")
        .unwrap()
        .with_results(|_: &JsonValue| -> JsonValue { panic!("results extractor must not run") })
        .with_next_url(|_: &JsonValue| -> Option<String> {
            panic!("next-url extractor must not run")
        });

    let outcome = endpoint.fetch().await.unwrap();

    assert_eq!(outcome.results, None);
    assert_eq!(outcome.pages, 1);
    assert!(!outcome.exchange.response.has_content());
}

#[tokio::test]
async fn test_fetch_malformed_body_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things").unwrap();
    let err = endpoint.fetch().await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_fetch_follows_next_page_urls() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1, 2],
            "next_page": "/p2"
        })))
        .mount(&mock_server)
        .await;
    // Absolute next URLs pass through unchanged
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [3],
            "next_page": format!("{}/p3", mock_server.uri())
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [4],
            "next_page": null
        })))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(MemoryLogger::new());
    let api = Arc::new(
        Api::builder(mock_server.uri())
            .logger(logger.clone())
            .build()
            .unwrap(),
    );
    let endpoint = paginated(Endpoint::new(api, "/things").unwrap());

    let outcome = endpoint.fetch().await.unwrap();

    assert_eq!(outcome.results, Some(json!([1, 2, 3, 4])));
    assert_eq!(outcome.pages, 3);
    // The recorded exchange is the initial one
    assert_eq!(
        outcome.exchange.response.json().unwrap()["items"],
        json!([1, 2])
    );
    // Follow-up pages are not logged
    assert_eq!(logger.len(), 2);
}

#[tokio::test]
async fn test_fetch_stops_on_empty_follow_up_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/p2"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let endpoint = paginated(Endpoint::new(api_for(&mock_server), "/things").unwrap());
    let outcome = endpoint.fetch().await.unwrap();

    assert_eq!(outcome.results, Some(json!([1])));
    assert_eq!(outcome.pages, 2);
}

#[tokio::test]
async fn test_fetch_concatenates_string_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chunks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chunk": "ab",
            "next_page": "/chunks2"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/chunks2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chunk": "cd"
        })))
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/chunks")
        .unwrap()
        .with_results(FieldResults::new("chunk"))
        .with_next_url(FieldNextUrl::new("next_page"));

    let outcome = endpoint.fetch().await.unwrap();
    assert_eq!(outcome.results, Some(json!("abcd")));
}

#[tokio::test]
async fn test_fetch_mismatched_page_shapes_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/p2"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": "three"
        })))
        .mount(&mock_server)
        .await;

    let endpoint = paginated(Endpoint::new(api_for(&mock_server), "/things").unwrap());
    let err = endpoint.fetch().await.unwrap_err();

    assert!(matches!(err, Error::Extract { .. }));
}

#[tokio::test]
async fn test_fetch_malformed_follow_up_body_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/p2"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("garbage"))
        .mount(&mock_server)
        .await;

    let endpoint = paginated(Endpoint::new(api_for(&mock_server), "/things").unwrap());
    let err = endpoint.fetch().await.unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_follow_ups_reuse_verb_and_carry_headers_only() {
    let mock_server = MockServer::start().await;

    // Initial request carries params and body alongside headers
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(query_param("page_size", "5"))
        .and(header("X-Token", "t-1"))
        .and(body_json(json!({"q": "widgets"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/search2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    // The follow-up keeps the verb and headers but drops params and body
    Mock::given(method("POST"))
        .and(path("/search2"))
        .and(query_param_is_missing("page_size"))
        .and(header("X-Token", "t-1"))
        .and(body_string(String::new()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [2]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Arc::new(
        Api::builder(mock_server.uri())
            .param("page_size", "5")
            .build()
            .unwrap(),
    );
    let endpoint = paginated(
        Endpoint::new(api, "/search")
            .unwrap()
            .with_method(Method::POST)
            .with_header("X-Token", "t-1")
            .with_json_field("q", "widgets"),
    );

    let outcome = endpoint.fetch().await.unwrap();
    assert_eq!(outcome.results, Some(json!([1, 2])));
}

// ============================================================================
// Logging
// ============================================================================

#[tokio::test]
async fn test_successful_exchange_logs_both_lines_at_info() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(MemoryLogger::new());
    let api = Arc::new(
        Api::builder(mock_server.uri())
            .logger(logger.clone())
            .build()
            .unwrap(),
    );
    let endpoint = Endpoint::new(api, "/things").unwrap();

    endpoint.fetch().await.unwrap();

    let entries = logger.entries();
    assert_eq!(entries.len(), 2);

    let (request_level, request_line) = &entries[0];
    assert_eq!(*request_level, LogLevel::Info);
    assert_eq!(*request_line, format!("GET {}/things\n", mock_server.uri()));

    let (response_level, response_line) = &entries[1];
    assert_eq!(*response_level, LogLevel::Info);
    assert!(response_line.starts_with("200\n"));
    assert!(response_line.contains("content-type: application/json\n"));
    assert!(response_line.ends_with("\n\n{\"ok\":true}"));
}

#[tokio::test]
async fn test_failed_exchange_logs_at_error_then_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(MemoryLogger::new());
    let api = Arc::new(
        Api::builder(mock_server.uri())
            .logger(logger.clone())
            .build()
            .unwrap(),
    );
    let endpoint = Endpoint::new(api, "/missing").unwrap();

    let err = endpoint.fetch().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not found"));

    // Both lines were logged before the failure propagated
    let entries = logger.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, LogLevel::Error);
    assert_eq!(entries[1].0, LogLevel::Error);
    assert!(entries[1].1.starts_with("404\n"));
}

#[tokio::test]
async fn test_follow_up_failure_is_not_logged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/p2"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let logger = Arc::new(MemoryLogger::new());
    let api = Arc::new(
        Api::builder(mock_server.uri())
            .logger(logger.clone())
            .build()
            .unwrap(),
    );
    let endpoint = paginated(Endpoint::new(api, "/things").unwrap());

    let err = endpoint.fetch().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    // Only the successful initial exchange was logged, at info
    let entries = logger.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, LogLevel::Info);
}

// ============================================================================
// Merge & Overrides
// ============================================================================

#[tokio::test]
async fn test_call_overrides_win_on_the_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/things"))
        .and(header("X-Tier", "call"))
        .and(header("one", "apple"))
        .and(query_param("two", "banana"))
        .and(body_json(json!({"three": "grape"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Arc::new(
        Api::builder(mock_server.uri())
            .header("X-Tier", "root")
            .header("one", "apple")
            .build()
            .unwrap(),
    );
    let endpoint = Endpoint::new(api, "/things")
        .unwrap()
        .with_method(Method::POST)
        .with_param("two", "banana");

    let overrides = RequestLayer::new()
        .with_header("X-Tier", "call")
        .with_json_field("three", "grape");

    let outcome = endpoint.fetch_with(&overrides).await.unwrap();
    assert_eq!(outcome.results, Some(json!({"ok": true})));
}

#[tokio::test]
async fn test_fetch_without_body_fields_sends_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .and(body_string(String::new()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things").unwrap();
    let outcome = endpoint.fetch().await.unwrap();

    assert!(outcome.exchange.request.body.is_none());
}

// ============================================================================
// Auth & Retry
// ============================================================================

#[tokio::test]
async fn test_auth_applied_to_every_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [1],
            "next_page": "/p2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [2]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = Arc::new(
        Api::builder(mock_server.uri())
            .auth(AuthConfig::bearer("tok-1"))
            .build()
            .unwrap(),
    );
    let endpoint = paginated(Endpoint::new(api, "/things").unwrap());

    let outcome = endpoint.fetch().await.unwrap();
    assert_eq!(outcome.results, Some(json!([1, 2])));
}

#[tokio::test]
async fn test_retry_policy_recovers_from_transient_failure() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let api = Arc::new(
        Api::builder(mock_server.uri())
            .retry(RetryPolicy {
                max_retries: 3,
                min_backoff: Duration::from_millis(10),
                max_backoff: Duration::from_millis(50),
            })
            .build()
            .unwrap(),
    );
    let endpoint = Endpoint::new(api, "/things").unwrap();

    let outcome = endpoint.fetch().await.unwrap();

    // Retries happen inside the transport; they are not extra pages
    assert_eq!(outcome.results, Some(json!({"ok": true})));
    assert_eq!(outcome.pages, 1);
}

#[tokio::test]
async fn test_without_retry_policy_failure_surfaces_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things").unwrap();
    let err = endpoint.fetch().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("unavailable"));
}

// ============================================================================
// Sessions & Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_fetches_on_shared_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [1]})))
        .mount(&mock_server)
        .await;

    let endpoint = Arc::new(Endpoint::new(api_for(&mock_server), "/things").unwrap());

    let (first, second) = tokio::join!(endpoint.fetch(), endpoint.fetch());

    assert_eq!(first.unwrap().results, Some(json!({"items": [1]})));
    assert_eq!(second.unwrap().results, Some(json!({"items": [1]})));
}

#[tokio::test]
async fn test_endpoint_usable_after_failed_fetch() {
    let mock_server = MockServer::start().await;

    // First call fails, the next one succeeds with a fresh session
    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let endpoint = Endpoint::new(api_for(&mock_server), "/things").unwrap();

    let err = endpoint.fetch().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let outcome = endpoint.fetch().await.unwrap();
    assert_eq!(outcome.results, Some(json!({"ok": true})));
}
