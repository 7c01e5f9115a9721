//! Options for the retrying client

use mfd_domain::Error;
use reqwest::{Method, StatusCode};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_RETRIES, DEFAULT_TIMEOUT, PERMIT_RELEASE_THRESHOLD_MS,
};

/// Predicate consulted before retrying a failed attempt.
///
/// Receives the error for the attempt and the 1-based attempt number.
pub type RetryPredicate = Arc<dyn Fn(&Error, usize) -> bool + Send + Sync>;

/// Public options for [`RetryingClient`](crate::http::RetryingClient).
///
/// Includes test hooks for deterministic backoff.
#[derive(Clone)]
pub struct RetryOptions {
    /// Optional timeout for the underlying reqwest client
    pub timeout: Option<Duration>,

    /// Number of retries (not total attempts). Total attempts = retry + 1.
    pub retry: usize,

    /// Concurrency limit (number of simultaneous logical requests) used when
    /// `semaphore` is not provided
    pub limit: usize,

    /// Status codes that are considered retryable
    pub status_codes: HashSet<StatusCode>,

    /// Status codes that should be checked for a Retry-After header
    pub after_status_codes: HashSet<StatusCode>,

    /// Maximum allowed Retry-After duration (if set)
    pub max_retry_after: Option<Duration>,

    /// Maximum backoff limit for computed delays
    pub backoff_limit: Option<Duration>,

    /// Whether to retry on timeout errors
    pub retry_on_timeout: bool,

    /// Optional predicate to decide whether a failed attempt is retried
    pub should_retry: Option<RetryPredicate>,

    /// Allowed HTTP methods for requests
    pub allowed_methods: HashSet<Method>,

    /// Optional externally provided semaphore to share concurrency limits
    /// across client instances
    pub semaphore: Option<Arc<Semaphore>>,

    /// If true, backoff jitter is deterministic and small for tests
    pub test_mode: bool,

    /// When true, disable jitter entirely
    pub disable_jitter: bool,

    /// Threshold (ms) above which a permit is released before sleeping
    pub permit_release_threshold_ms: u64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        // retryable status codes: 408 413 429 500 502 503 504
        let status_codes = [408u16, 413, 429, 500, 502, 503, 504]
            .iter()
            .filter_map(|&c| StatusCode::from_u16(c).ok())
            .collect();

        // Retry-After status codes: 413 429 503
        let after_status_codes = [413u16, 429, 503]
            .iter()
            .filter_map(|&c| StatusCode::from_u16(c).ok())
            .collect();

        let allowed_methods = [
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::TRACE,
        ]
        .iter()
        .cloned()
        .collect();

        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            retry: DEFAULT_RETRIES,
            limit: DEFAULT_CONCURRENCY,
            status_codes,
            after_status_codes,
            max_retry_after: None,
            backoff_limit: None,
            retry_on_timeout: false,
            should_retry: None,
            allowed_methods,
            semaphore: None,
            test_mode: false,
            disable_jitter: false,
            permit_release_threshold_ms: PERMIT_RELEASE_THRESHOLD_MS,
        }
    }
}

impl std::fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryOptions")
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("limit", &self.limit)
            .field("max_retry_after", &self.max_retry_after)
            .field("backoff_limit", &self.backoff_limit)
            .field("retry_on_timeout", &self.retry_on_timeout)
            .field("has_should_retry", &self.should_retry.is_some())
            .field("test_mode", &self.test_mode)
            .field("disable_jitter", &self.disable_jitter)
            .finish_non_exhaustive()
    }
}
