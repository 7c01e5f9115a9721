//! Nasdaq API client
//!
//! Adapter for Nasdaq API endpoints: mandatory browser-mimicry headers,
//! JSON validation, and business-level status (`rCode`) checking.

use async_trait::async_trait;
use mfd_domain::{Error, JsonFeed, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::warn;

use crate::constants::{NASDAQ_BASE_URL, NASDAQ_SNIPPET_MAX};
use crate::http::{RetryOptions, RetryingClient};

/// Adapter for the Nasdaq API providing error handling and header management.
pub struct NasdaqClient {
    /// Internal resilient HTTP client instance
    http: RetryingClient,
    /// Base URL of the upstream service
    base_url: String,
}

impl Default for NasdaqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NasdaqClient {
    /// Create a client against the production Nasdaq API
    pub fn new() -> Self {
        Self::with_base_url(NASDAQ_BASE_URL)
    }

    /// Create a client against a custom base URL.
    ///
    /// Primarily used to point the adapter at a local mock server.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            http: RetryingClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mandatory headers for Nasdaq API requests.
    ///
    /// The CDN in front of the API rejects requests that do not look like a
    /// regular browser session.
    fn request_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        let headers = [
            ("authority", "api.nasdaq.com"),
            ("accept", "application/json, text/plain, */*"),
            ("accept-language", "en-US,en;q=0.9"),
            ("cache-control", "no-cache"),
            ("dnt", "1"),
            ("origin", "https://www.nasdaq.com"),
            ("pragma", "no-cache"),
            ("referer", "https://www.nasdaq.com/"),
            (
                "sec-ch-ua",
                r#""Google Chrome";v="119", "Chromium";v="119", "Not?A_Brand";v="24""#,
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", "\"Windows\""),
            ("sec-fetch-dest", "empty"),
            ("sec-fetch-mode", "cors"),
            ("sec-fetch-site", "same-site"),
            (
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
            ),
        ];

        for (k, v) in headers {
            if let (Ok(name), Ok(value)) = (k.parse::<HeaderName>(), HeaderValue::from_str(v)) {
                map.insert(name, value);
            }
        }
        map
    }

    /// Execute an API call with validation and optional per-call overrides.
    ///
    /// Validates that the response is valid JSON and that the business-level
    /// `status.rCode` is 200. When `options` is provided, a transient client
    /// is created for that specific call.
    pub async fn call(&self, endpoint: &str, options: Option<RetryOptions>) -> Result<Value> {
        if !endpoint.starts_with("http") {
            return Err(Error::http(format!("Invalid URL provided: {endpoint}")));
        }

        let response = match options {
            Some(opts) => {
                let transient = RetryingClient::with_options(opts);
                transient
                    .get::<Value>(endpoint, Self::request_headers())
                    .await?
            }
            None => {
                self.http
                    .get::<Value>(endpoint, Self::request_headers())
                    .await?
            }
        };

        // Non-success means the body never parsed as the expected JSON:
        // maintenance pages and CDN blocks come back as HTML.
        if !response.success {
            let body = response.error_body.as_deref().unwrap_or("");
            let snippet = snippet_of(body, NASDAQ_SNIPPET_MAX);

            warn!(
                url = endpoint,
                status = response.status,
                body_snippet = snippet,
                "Nasdaq feed returned non-JSON content or HTTP error"
            );

            return Err(Error::NonJsonResponse {
                url: endpoint.to_string(),
                status: response.status,
                body_snippet: snippet.to_string(),
            });
        }

        let body = response.data.unwrap_or(Value::Null);

        // Validate the business status block
        let r_code = body
            .get("status")
            .and_then(|s| s.get("rCode"))
            .and_then(Value::as_i64);

        match r_code {
            Some(200) => Ok(body),
            Some(code) => {
                // Strip the bulky data field so logs carry metadata only
                let mut error_meta = body.clone();
                if let Some(obj) = error_meta.as_object_mut() {
                    obj.remove("data");
                }

                warn!(
                    r_code = code,
                    url = endpoint,
                    context = %error_meta,
                    "Nasdaq business-level error detected"
                );

                Err(Error::ApiStatus {
                    r_code: code,
                    endpoint: endpoint.to_string(),
                    response: body,
                })
            }
            None => {
                warn!(url = endpoint, "malformed Nasdaq response structure");
                Err(Error::MalformedResponse {
                    endpoint: endpoint.to_string(),
                    details: "Missing 'rCode' in response status block".into(),
                })
            }
        }
    }
}

#[async_trait]
impl JsonFeed for NasdaqClient {
    async fn fetch(&self, url: &str) -> Result<Value> {
        self.call(url, None).await
    }
}

/// Clip a body snippet to `max` bytes on a char boundary.
fn snippet_of(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = NasdaqClient::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn headers_mimic_a_browser() {
        let headers = NasdaqClient::request_headers();
        assert!(headers.contains_key("user-agent"));
        assert_eq!(headers.get("origin").unwrap(), "https://www.nasdaq.com");
    }

    #[tokio::test]
    async fn rejects_non_http_endpoint() {
        let client = NasdaqClient::new();
        let err = client.call("ftp://example.com", None).await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
