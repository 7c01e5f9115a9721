//! Retrying HTTP client
//!
//! Wraps reqwest with retry semantics shared by every feed adapter:
//! bounded concurrency, exponential backoff with jitter, Retry-After
//! handling (numeric and HTTP-date forms), and a single body read per
//! attempt.

use chrono::{DateTime, NaiveDateTime, Utc};
use mfd_domain::{Error, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::constants::{ERROR_BODY_SNIPPET_MAX, PERMIT_REACQUIRE_TIMEOUT};
use crate::http::options::RetryOptions;
use crate::http::response::FeedResponse;

/// Seed used for deterministic jitter in test mode
const TEST_MODE_RNG_SEED: u64 = 0xC0FFEE;

/// One raw HTTP exchange: status, headers, and the body read exactly once.
struct RawExchange {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

/// Resilient HTTP helper.
///
/// Cloning is cheap; clones share the underlying connection pool and,
/// when configured with an external semaphore, the concurrency budget.
#[derive(Clone)]
pub struct RetryingClient {
    client: Client,
    opts: RetryOptions,
    semaphore: Arc<Semaphore>,
}

impl Default for RetryingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryingClient {
    /// Create a client with default options
    pub fn new() -> Self {
        Self::with_options(RetryOptions::default())
    }

    /// Create a client with the given options
    pub fn with_options(opts: RetryOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|_| Client::new());

        let semaphore = match &opts.semaphore {
            Some(shared) => shared.clone(),
            None => Arc::new(Semaphore::new(opts.limit.max(1))),
        };

        Self {
            client,
            opts,
            semaphore,
        }
    }

    /// Compute exponential backoff with optional jitter. `attempt` is 1-based.
    fn compute_backoff(&self, attempt: usize, rng: &mut SmallRng) -> Duration {
        let exp = 2f64.powi(attempt as i32 - 1);
        let mut base_ms = (0.3f64 * exp * 1000.0).round() as u64;

        if let Some(limit) = self.opts.backoff_limit {
            base_ms = base_ms.min(limit.as_millis() as u64);
        }

        let jitter_ms = if self.opts.disable_jitter {
            0
        } else {
            let jitter_max = (base_ms / 10).max(1);
            if self.opts.test_mode {
                // small deterministic jitter in test mode
                rng.random_range(0..=jitter_max.min(5))
            } else {
                rng.random_range(0..=jitter_max)
            }
        };

        let mut candidate = base_ms.saturating_add(jitter_ms);
        if let Some(max_ra) = self.opts.max_retry_after {
            candidate = candidate.min(max_ra.as_millis() as u64);
        }
        if let Some(limit) = self.opts.backoff_limit {
            candidate = candidate.min(limit.as_millis() as u64);
        }

        Duration::from_millis(candidate)
    }

    /// Cap a server-provided Retry-After duration.
    ///
    /// `max_retry_after` takes precedence over `backoff_limit`.
    fn cap_retry_after(&self, retry_after: Duration) -> Duration {
        if let Some(max) = self.opts.max_retry_after {
            retry_after.min(max)
        } else if let Some(limit) = self.opts.backoff_limit {
            retry_after.min(limit)
        } else {
            retry_after
        }
    }

    /// Parse a Retry-After header.
    ///
    /// Supports numeric seconds, IMF-fixdate, RFC 2822, and RFC 3339.
    /// Durations clamp to at least one second.
    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        let value = headers.get("retry-after")?.to_str().ok()?;
        let value = value.trim();

        if let Ok(secs) = value.parse::<u64>() {
            return Some(Duration::from_secs(secs.max(1)));
        }

        let until = |dt: DateTime<Utc>| {
            let diff = dt.signed_duration_since(Utc::now());
            Duration::from_secs(diff.num_seconds().max(1) as u64)
        };

        // IMF-fixdate carries a literal GMT suffix with no numeric offset
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%a, %d %b %Y %H:%M:%S GMT") {
            return Some(until(naive.and_utc()));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
            return Some(until(dt.with_timezone(&Utc)));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(until(dt.with_timezone(&Utc)));
        }

        None
    }

    /// Sleep, releasing the permit first for long waits and attempting a
    /// bounded re-acquire afterwards. Short waits keep the permit to
    /// preserve logical ordering.
    async fn sleep_maybe_release(
        &self,
        duration: Duration,
        permit: &mut Option<OwnedSemaphorePermit>,
    ) {
        if duration.as_millis() as u64 > self.opts.permit_release_threshold_ms {
            let _released = permit.take();
            sleep(duration).await;
            if let Ok(Ok(reacquired)) = timeout(
                PERMIT_REACQUIRE_TIMEOUT,
                self.semaphore.clone().acquire_owned(),
            )
            .await
            {
                *permit = Some(reacquired);
            }
        } else {
            sleep(duration).await;
        }
    }

    /// Build and execute one request, reading the body exactly once.
    async fn execute_once<B>(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        body: Option<&B>,
    ) -> std::result::Result<RawExchange, reqwest::Error>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method.clone(), url).headers(headers.clone());
        if let Some(b) = body {
            builder = builder.json(b);
        }
        let response = builder.send().await?;

        let status = response.status();
        let resp_headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();

        Ok(RawExchange {
            status,
            headers: resp_headers,
            body,
        })
    }

    /// Convert a raw exchange into the caller-facing response.
    ///
    /// On 2xx the body must parse into `T`; anything else is returned as a
    /// non-success response carrying the raw body.
    fn finish<T: DeserializeOwned>(exchange: RawExchange) -> Result<FeedResponse<T>> {
        let status = exchange.status.as_u16();
        if exchange.status.is_success() {
            let parsed = serde_json::from_str::<T>(&exchange.body)
                .map_err(|e| Error::http(format!("JSON decode: {e}")))?;
            Ok(FeedResponse {
                data: Some(parsed),
                error_body: None,
                status,
                success: true,
                headers: exchange.headers,
            })
        } else {
            Ok(FeedResponse {
                data: None,
                error_body: (!exchange.body.is_empty()).then_some(exchange.body),
                status,
                success: false,
                headers: exchange.headers,
            })
        }
    }

    /// One final request after a Retry-After wait on the last configured
    /// attempt. The server asked us to wait, so waiting and asking once more
    /// beats giving up with the stale failure.
    async fn final_attempt<T, B>(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        body: Option<&B>,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<FeedResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let outcome = self.execute_once(method, url, headers, body).await;
        drop(permit);
        match outcome {
            Ok(exchange) => Self::finish(exchange),
            Err(e) => Err(Error::http(e.to_string())),
        }
    }

    /// Core request logic with retries and concurrency control.
    async fn request_with_retry<T, B>(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&B>,
    ) -> Result<FeedResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if !self.opts.allowed_methods.contains(&method) {
            warn!(method = %method, url, "method not allowed");
            return Err(Error::internal(format!(
                "Method {} not allowed",
                method.as_str()
            )));
        }

        debug!(method = %method, url, "request start");

        // total attempts = retry + 1
        let max_attempts = self.opts.retry.saturating_add(1);

        // One permit per logical request, held across its retries
        let mut permit: Option<OwnedSemaphorePermit> = Some(
            self.semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| Error::internal("Semaphore closed"))?,
        );

        let mut rng = if self.opts.test_mode {
            SmallRng::seed_from_u64(TEST_MODE_RNG_SEED)
        } else {
            SmallRng::from_os_rng()
        };

        // Diagnostics for the exhaustion error
        let mut last_err: Option<Error> = None;
        let mut last_status: Option<u16> = None;
        let mut last_snippet: Option<String> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                info!(url, attempt, "retry attempt");
            }

            match self.execute_once(&method, url, &headers, body).await {
                Ok(exchange) => {
                    if exchange.status.is_success() {
                        drop(permit);
                        return Self::finish(exchange);
                    }

                    let status = exchange.status;
                    last_status = Some(status.as_u16());
                    last_snippet = Some(truncate_snippet(&exchange.body, ERROR_BODY_SNIPPET_MAX));
                    last_err = Some(Error::http(format!("Status: {}", status.as_u16())));

                    // Prefer a server-provided Retry-After when the status
                    // is in the Retry-After set, or when it is retryable.
                    let retryable = self.opts.status_codes.contains(&status);
                    let honor_retry_after =
                        self.opts.after_status_codes.contains(&status) || retryable;

                    if honor_retry_after
                        && let Some(retry_after) = Self::parse_retry_after(&exchange.headers)
                    {
                        let capped = self.cap_retry_after(retry_after);
                        info!(url, retry_after_secs = capped.as_secs(), "respecting Retry-After header");
                        self.sleep_maybe_release(capped, &mut permit).await;
                        if attempt < max_attempts {
                            continue;
                        }
                        return self.final_attempt(&method, url, &headers, body, permit).await;
                    }

                    if retryable && attempt < max_attempts {
                        let backoff = self.compute_backoff(attempt, &mut rng);
                        self.sleep_maybe_release(backoff, &mut permit).await;
                        continue;
                    }

                    // Not retryable, or attempts exhausted: hand the failure back
                    drop(permit);
                    return Self::finish(exchange);
                }
                Err(e) => {
                    warn!(url, error = %e, "network failure");

                    if e.is_timeout() && !self.opts.retry_on_timeout {
                        drop(permit);
                        return Err(Error::http(e.to_string()));
                    }

                    let err = Error::http(e.to_string());
                    let should = match &self.opts.should_retry {
                        Some(pred) => pred(&err, attempt),
                        None => true,
                    };
                    last_err = Some(err);

                    if !should {
                        break;
                    }
                    if attempt < max_attempts {
                        let backoff = self.compute_backoff(attempt, &mut rng);
                        self.sleep_maybe_release(backoff, &mut permit).await;
                    }
                }
            }
        }

        // Exhausted attempts on network failures: enriched diagnostics
        drop(permit);
        let mut parts = Vec::new();
        if let Some(s) = last_status {
            parts.push(format!("status={s}"));
        }
        if let Some(b) = last_snippet {
            parts.push(format!("body=\"{}\"", b.replace('"', "'")));
        }
        parts.push(format!("attempts={max_attempts}"));
        if let Some(e) = last_err {
            parts.push(format!("last_err=\"{}\"", e.to_string().replace('"', "'")));
        }
        Err(Error::internal(parts.join(", ")))
    }

    /// GET request that parses JSON into `T`
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::GET, url, headers, Option::<&()>::None)
            .await
    }

    /// POST request with a JSON body, parsing the JSON response into `T`
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::POST, url, headers, Some(body))
            .await
    }

    /// PUT request with a JSON body, parsing the JSON response into `T`
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::PUT, url, headers, Some(body))
            .await
    }

    /// PATCH request with a JSON body, parsing the JSON response into `T`
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::PATCH, url, headers, Some(body))
            .await
    }

    /// DELETE request that parses JSON into `T`
    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::DELETE, url, headers, Option::<&()>::None)
            .await
    }

    /// HEAD request. Returns a response with no parsed body (`data` = None).
    pub async fn head(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FeedResponse<serde_json::Value>> {
        // HEAD has no body; a Value target tolerates the empty read
        self.request_with_retry(Method::HEAD, url, headers, Option::<&()>::None)
            .await
    }

    /// OPTIONS request that parses JSON into `T`
    pub async fn options<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::OPTIONS, url, headers, Option::<&()>::None)
            .await
    }

    /// TRACE request that parses JSON into `T`
    pub async fn trace<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<FeedResponse<T>> {
        self.request_with_retry(Method::TRACE, url, headers, Option::<&()>::None)
            .await
    }
}

/// Truncate a body snippet on a char boundary, marking the cut.
fn truncate_snippet(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
