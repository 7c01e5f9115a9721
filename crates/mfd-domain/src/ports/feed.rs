//! JSON feed port

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A remote feed that answers GET requests with validated JSON.
///
/// Implementations are responsible for transport resilience (retries,
/// concurrency limits) and for upstream-specific response validation, so
/// callers receive either a usable JSON document or a domain error.
///
/// ## Thread Safety
///
/// All implementations must be `Send + Sync` for thread-safe sharing
/// across async contexts.
#[async_trait]
pub trait JsonFeed: Send + Sync {
    /// Fetch and validate a JSON document from the given URL
    async fn fetch(&self, url: &str) -> Result<Value>;
}
