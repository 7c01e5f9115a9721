//! Error handling types

use serde_json::Value;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for market-feed
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Transport-level HTTP request or network failure
    #[error("HTTP error: {message}")]
    Http {
        /// Description of the HTTP error
        message: String,
    },

    /// The upstream feed returned something that is not JSON.
    /// This often occurs when the service is behind a maintenance page or proxy.
    #[error("Feed returned non-JSON content from {url}. Status: {status}")]
    NonJsonResponse {
        /// The target URL that was requested
        url: String,
        /// The HTTP status code received
        status: u16,
        /// A snippet of the response body for diagnostics
        body_snippet: String,
    },

    /// The feed returned a successful HTTP status but a business-level
    /// failure (the `rCode` in the status block is not 200).
    #[error("Feed business error (rCode {r_code}) at {endpoint}")]
    ApiStatus {
        /// The rCode returned in the JSON status block
        r_code: i64,
        /// The endpoint URL that was called
        endpoint: String,
        /// The full JSON response body for deeper inspection
        response: Value,
    },

    /// The JSON structure is missing expected mandatory fields
    #[error("Malformed feed response structure at {endpoint}: {details}")]
    MalformedResponse {
        /// The endpoint URL that was called
        endpoint: String,
        /// Description of why the structure was considered malformed
        details: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an HTTP transport error
    pub fn http<S: Into<String>>(message: S) -> Self {
        Self::Http {
            message: message.into(),
        }
    }
}
