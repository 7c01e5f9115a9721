//! Configuration types

use mfd_providers::constants::{CNN_BASE_URL, NASDAQ_BASE_URL};
use mfd_providers::http::RetryOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// HTTP client configuration
    pub http: HttpConfig,

    /// Upstream feed configuration
    pub feeds: FeedsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to emit JSON-formatted log lines
    pub json_format: bool,

    /// Optional log file path; enables a daily-rolling file appender
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Number of retries (total attempts = retry + 1)
    pub retry: usize,

    /// Number of simultaneous logical requests
    pub limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let opts = RetryOptions::default();
        Self {
            timeout_secs: opts.timeout.map(|t| t.as_secs()).unwrap_or(15),
            retry: opts.retry,
            limit: opts.limit,
        }
    }
}

impl HttpConfig {
    /// Bridge this configuration into client retry options
    pub fn retry_options(&self) -> RetryOptions {
        RetryOptions {
            timeout: Some(Duration::from_secs(self.timeout_secs)),
            retry: self.retry,
            limit: self.limit,
            ..RetryOptions::default()
        }
    }
}

/// Upstream feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    /// Base URL for the Nasdaq API
    pub nasdaq_base_url: String,

    /// Base URL for the CNN dataviz API
    pub cnn_base_url: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            nasdaq_base_url: NASDAQ_BASE_URL.to_string(),
            cnn_base_url: CNN_BASE_URL.to_string(),
        }
    }
}
