//! Provider implementations for market-feed
//!
//! Adapters for the upstream market-data services, built on a shared
//! retrying HTTP client:
//!
//! - [`http`] - resilient HTTP helper with retry, backoff, and
//!   concurrency limiting
//! - [`nasdaq`] - Nasdaq API adapter and market status service
//! - [`cnn`] - CNN Business API adapter and Fear & Greed service

/// Shared provider constants
pub mod constants;

/// Resilient HTTP client
pub mod http;

/// Nasdaq feed adapter and services
pub mod nasdaq;

/// CNN Business feed adapter and services
pub mod cnn;

pub use http::{FeedResponse, RetryOptions, RetryingClient};
