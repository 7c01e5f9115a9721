//! Integration tests for the retrying HTTP client, covering:
//! - success and failure scenarios for the supported HTTP methods
//! - default and custom configuration behavior
//! - concurrency limiting via semaphores
//! - exponential backoff and Retry-After header logic

use mfd_domain::Error;
use mfd_providers::http::{RetryOptions, RetryingClient};
use reqwest::header::{HeaderMap, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A simple serializable struct used to verify JSON request and response bodies.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct TestData {
    message: String,
}

/// Fast options for failure-path tests: no real-time backoff waits.
fn fast_opts() -> RetryOptions {
    RetryOptions {
        backoff_limit: Some(Duration::from_millis(10)),
        disable_jitter: true,
        ..RetryOptions::default()
    }
}

#[tokio::test]
async fn default_get_success() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::new();

    let body = TestData {
        message: "success".into(),
    };

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&mock_server)
        .await;

    let res = client
        .get::<TestData>(&format!("{}/ok", mock_server.uri()), HeaderMap::new())
        .await
        .expect("request should not fail");

    assert!(res.success);
    assert_eq!(res.status, 200);
    assert_eq!(res.data.unwrap(), body);
}

#[tokio::test]
async fn default_retry_exhaustion() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::with_options(fast_opts());

    // 1 initial attempt + 2 default retries
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let res = client
        .get::<serde_json::Value>(&mock_server.uri(), HeaderMap::new())
        .await
        .unwrap();

    assert!(!res.success);
    assert_eq!(res.status, 500);
}

#[tokio::test]
async fn custom_retry_and_backoff() {
    let mock_server = MockServer::start().await;

    let mut opts = fast_opts();
    opts.retry = 4;

    let client = RetryingClient::with_options(opts);

    // 5 total attempts for 4 configured retries
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({})))
        .expect(5)
        .mount(&mock_server)
        .await;

    let res = client
        .get::<serde_json::Value>(&mock_server.uri(), HeaderMap::new())
        .await
        .unwrap();
    assert!(!res.success);
    assert_eq!(res.status, 503);
}

#[tokio::test]
async fn retry_after_numeric_header_is_respected() {
    let mock_server = MockServer::start().await;

    // Two rate-limited responses first
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    // Then eventual success
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "eventual success"
        })))
        .mount(&mock_server)
        .await;

    let opts = RetryOptions {
        retry: 3,
        ..RetryOptions::default()
    };
    let client = RetryingClient::with_options(opts);

    let res = client
        .get::<TestData>(&mock_server.uri(), HeaderMap::new())
        .await
        .expect("request should eventually succeed after retries");

    assert!(res.success);
    assert_eq!(res.status, 200);
    assert_eq!(res.data.unwrap().message, "eventual success");
}

#[tokio::test]
async fn concurrency_is_limited_by_the_semaphore() {
    let mock_server = MockServer::start().await;

    let mut opts = RetryOptions::default();
    opts.limit = 1;

    let client = RetryingClient::with_options(opts);

    // Each request takes 200ms
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(serde_json::json!({})),
        )
        .mount(&mock_server)
        .await;

    let server_uri = mock_server.uri();
    let start = std::time::Instant::now();

    let req1 = client.get::<serde_json::Value>(&server_uri, HeaderMap::new());
    let req2 = client.get::<serde_json::Value>(&server_uri, HeaderMap::new());

    let (res1, res2) = tokio::join!(req1, req2);

    assert!(res1.is_ok());
    assert!(res2.is_ok());
    // Serialized by the semaphore, so at least 400ms in total
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn disallowed_methods_are_rejected() {
    let mock_server = MockServer::start().await;

    let mut opts = RetryOptions::default();
    opts.allowed_methods.remove(&reqwest::Method::POST);

    let client = RetryingClient::with_options(opts);

    let res = client
        .post::<serde_json::Value, _>(
            &mock_server.uri(),
            HeaderMap::new(),
            &serde_json::json!({}),
        )
        .await;

    match res {
        Err(Error::Internal { message }) => {
            assert!(message.contains("Method POST not allowed"));
        }
        other => panic!("expected Internal error for restricted method, got {other:?}"),
    }
}

#[tokio::test]
async fn post_transmits_json_body() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::new();
    let payload = TestData {
        message: "payload_content".into(),
    };

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&payload))
        .mount(&mock_server)
        .await;

    let res = client
        .post::<TestData, _>(&mock_server.uri(), HeaderMap::new(), &payload)
        .await
        .expect("post failed");

    assert_eq!(res.status, 201);
    assert_eq!(res.data.unwrap(), payload);
}

#[tokio::test]
async fn custom_headers_are_transmitted() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::new();

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, "RetryClientTestAgent/1.0".parse().unwrap());

    Mock::given(method("GET"))
        .and(header("user-agent", "RetryClientTestAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let res = client
        .get::<serde_json::Value>(&mock_server.uri(), headers)
        .await
        .unwrap();

    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn non_retryable_status_fails_without_retrying() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::with_options(fast_opts());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let res = client
        .get::<serde_json::Value>(&mock_server.uri(), HeaderMap::new())
        .await
        .unwrap();

    assert!(!res.success);
    assert_eq!(res.status, 404);
    assert_eq!(res.error_body.as_deref(), Some("missing"));
}

#[tokio::test]
async fn success_with_invalid_json_is_a_decode_error() {
    let mock_server = MockServer::start().await;
    let client = RetryingClient::new();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let err = client
        .get::<TestData>(&mock_server.uri(), HeaderMap::new())
        .await
        .unwrap_err();

    match err {
        Error::Http { message } => assert!(message.contains("JSON decode")),
        other => panic!("expected Http decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn timeouts_fail_immediately_by_default() {
    let mock_server = MockServer::start().await;

    let opts = RetryOptions {
        timeout: Some(Duration::from_millis(250)),
        ..RetryOptions::default()
    };
    let client = RetryingClient::with_options(opts);

    // Slower than the client timeout; must not be retried
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(serde_json::json!({})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client
        .get::<serde_json::Value>(&mock_server.uri(), HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http { .. }));
}
