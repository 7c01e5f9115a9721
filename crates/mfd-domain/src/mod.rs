//! Domain layer for market-feed
//!
//! Core business types shared by every other crate in the workspace:
//! the central error taxonomy, value objects for market status and
//! sentiment readings, and the port traits implemented by feed adapters.

/// Error handling types
pub mod error;
/// Port traits implemented by adapters in outer layers
pub mod ports;
/// Immutable domain value objects
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::JsonFeed;
pub use value_objects::{FearGreedSnapshot, FngReading, MarketStatusData};
