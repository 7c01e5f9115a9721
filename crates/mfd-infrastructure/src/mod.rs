//! Infrastructure layer for market-feed
//!
//! Cross-cutting technical concerns: configuration loading (local files,
//! environment, and encrypted remote documents), structured logging, and
//! system telemetry snapshots.

/// Configuration loading and types
pub mod config;
/// Structured logging with tracing
pub mod logging;
/// System telemetry snapshots
pub mod telemetry;

pub use config::{AppConfig, ConfigLoader, FeedsConfig, HttpConfig, LoggingConfig, RemoteConfig};
pub use logging::{init_logging, parse_log_level};
pub use telemetry::{SystemProbe, SystemSnapshot};
