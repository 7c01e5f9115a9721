//! Resilient HTTP client
//!
//! A retrying, concurrency-limited HTTP helper used by every feed adapter:
//! single-body read, exponential backoff with jitter, explicit Retry-After
//! handling, and bounded permit re-acquisition for long waits.

/// Client options
pub mod options;
/// Response wrapper
pub mod response;
/// The retrying client itself
pub mod client;

pub use client::RetryingClient;
pub use options::RetryOptions;
pub use response::FeedResponse;
