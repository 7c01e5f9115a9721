//! Configuration
//!
//! Local configuration merges defaults, a TOML file, and `MFD_`-prefixed
//! environment variables via Figment. Deployments without local files can
//! pull an encrypted JSON document from a remote URL instead.

/// Local configuration loader
pub mod loader;
/// Encrypted remote configuration
pub mod remote;
/// Configuration types
pub mod types;

pub use loader::ConfigLoader;
pub use remote::RemoteConfig;
pub use types::{AppConfig, FeedsConfig, HttpConfig, LoggingConfig};
