//! Shared provider constants

use std::time::Duration;

/// Default base URL for the Nasdaq API
pub const NASDAQ_BASE_URL: &str = "https://api.nasdaq.com";

/// Default base URL for the CNN dataviz API
pub const CNN_BASE_URL: &str = "https://production.dataviz.cnn.io";

/// Default request timeout for the retrying client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of retries (total attempts = retries + 1)
pub const DEFAULT_RETRIES: usize = 2;

/// Default number of simultaneous logical requests
pub const DEFAULT_CONCURRENCY: usize = 2;

/// Sleeps longer than this release their concurrency permit first
pub const PERMIT_RELEASE_THRESHOLD_MS: u64 = 2000;

/// Bounded wait when re-acquiring a permit after a long sleep
pub const PERMIT_REACQUIRE_TIMEOUT: Duration = Duration::from_millis(200);

/// Maximum stored length of an error body snippet in retry diagnostics
pub const ERROR_BODY_SNIPPET_MAX: usize = 1024;

/// Maximum snippet length reported for Nasdaq non-JSON responses
pub const NASDAQ_SNIPPET_MAX: usize = 200;

/// Maximum snippet length reported for CNN non-JSON responses
pub const CNN_SNIPPET_MAX: usize = 250;
