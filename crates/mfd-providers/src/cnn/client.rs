//! CNN Business API client
//!
//! Adapter for CNN Business data services. Mirrors the design of the
//! Nasdaq client, with browser-mimicry headers and per-request
//! configuration overrides.

use async_trait::async_trait;
use mfd_domain::{Error, JsonFeed, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::warn;

use crate::constants::{CNN_BASE_URL, CNN_SNIPPET_MAX};
use crate::http::{RetryOptions, RetryingClient};

/// Adapter for CNN APIs supporting flexible endpoints and custom headers.
///
/// Wraps a [`RetryingClient`] and maintains its own header set so that all
/// requests to CNN services appear consistent.
pub struct CnnClient {
    /// Resilient HTTP client with retry logic
    http: RetryingClient,
    /// Base URL of the upstream service
    base_url: String,
    /// Internal storage for request headers
    headers: HeaderMap,
}

impl Default for CnnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CnnClient {
    /// Create a client against the production CNN dataviz API
    pub fn new() -> Self {
        Self::with_base_url(CNN_BASE_URL)
    }

    /// Create a client against a custom base URL.
    ///
    /// Primarily used to point the adapter at a local mock server.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        let mut client = Self {
            http: RetryingClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
        };
        client.set_default_headers();
        client
    }

    /// The base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Reset the internal headers to the default browser-mimicry set.
    ///
    /// These headers mimic a standard Windows Chrome browser so requests are
    /// not flagged as automated traffic by CDN filters.
    fn set_default_headers(&mut self) {
        let headers = [
            ("authority", "production.dataviz.cnn.io"),
            ("accept", "*/*"),
            ("accept-language", "en-US,en;q=0.9"),
            ("cache-control", "no-cache"),
            ("dnt", "1"),
            ("origin", "https://edition.cnn.com"),
            ("pragma", "no-cache"),
            ("referer", "https://edition.cnn.com/"),
            (
                "sec-ch-ua",
                r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#,
            ),
            ("sec-ch-ua-mobile", "?0"),
            ("sec-ch-ua-platform", "\"Windows\""),
            ("sec-fetch-dest", "empty"),
            ("sec-fetch-mode", "cors"),
            ("sec-fetch-site", "cross-site"),
            (
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
        ];

        for (k, v) in headers {
            if let Ok(value) = HeaderValue::from_str(v) {
                self.headers.insert(k, value);
            }
        }
    }

    /// Update or add a specific header
    pub fn set_header(&mut self, key: &str, value: &str) {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, val);
        }
    }

    /// A clone of the current header set
    pub fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    /// Execute a GET request against the given CNN endpoint.
    ///
    /// When `options` is provided, a transient client is created for that
    /// specific call.
    ///
    /// # Errors
    /// Returns [`Error::NonJsonResponse`] if the server returns non-JSON
    /// content or a non-success HTTP status code.
    pub async fn call(&self, endpoint: &str, options: Option<RetryOptions>) -> Result<Value> {
        let response = match options {
            Some(opts) => {
                let transient = RetryingClient::with_options(opts);
                transient.get::<Value>(endpoint, self.headers()).await?
            }
            None => self.http.get::<Value>(endpoint, self.headers()).await?,
        };

        if !response.success {
            let body = response.error_body.as_deref().unwrap_or("[No Body]");
            let snippet = snippet_of(body, CNN_SNIPPET_MAX);

            warn!(
                url = endpoint,
                status = response.status,
                snippet,
                "CNN feed request failed"
            );

            return Err(Error::NonJsonResponse {
                url: endpoint.to_string(),
                status: response.status,
                body_snippet: snippet.to_string(),
            });
        }

        Ok(response.data.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl JsonFeed for CnnClient {
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
