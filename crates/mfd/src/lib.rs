//! # market-feed
//!
//! Resilient retrieval of U.S. market operational data and market sentiment:
//! Nasdaq market status and trading calendar, and the CNN Fear & Greed
//! index, on top of a retrying, concurrency-limited HTTP client.
//!
//! ## Example
//!
//! ```no_run
//! use mfd::providers::nasdaq::MarketStatus;
//!
//! # async fn example() -> mfd::domain::Result<()> {
//! let service = MarketStatus::new();
//! let status = service.fetch_status(None).await?;
//! if service.is_regular_session(&status) {
//!     println!("market is open");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The workspace follows a layered layout:
//!
//! - `domain` - core types, errors, and ports
//! - `providers` - the retrying HTTP client and feed adapters
//! - `infrastructure` - configuration, logging, and telemetry

/// Domain layer - core types, errors, and ports
pub mod domain {
    pub use mfd_domain::*;
}

/// Provider layer - HTTP client and feed adapters
pub mod providers {
    pub use mfd_providers::*;
}

/// Infrastructure layer - configuration, logging, and telemetry
pub mod infrastructure {
    pub use mfd_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::{Error, FearGreedSnapshot, FngReading, MarketStatusData, Result};
pub use providers::{FeedResponse, RetryOptions, RetryingClient};
