//! Response wrapper returned by the retrying client

use reqwest::header::HeaderMap;

/// Standard response wrapper returned by [`RetryingClient`](crate::http::RetryingClient) methods.
#[derive(Debug)]
pub struct FeedResponse<T> {
    /// Parsed JSON body on success
    pub data: Option<T>,

    /// Raw error body text on non-success
    pub error_body: Option<String>,

    /// HTTP status code
    pub status: u16,

    /// Whether the response was successful (2xx)
    pub success: bool,

    /// Response headers
    pub headers: HeaderMap,
}
