//! Domain ports
//!
//! Port traits that outer layers implement. Adapters for concrete upstream
//! feeds live in `mfd-providers`; services depend on these abstractions
//! where they do not need a specific adapter.

/// JSON feed port implemented by upstream API adapters
pub mod feed;

pub use feed::JsonFeed;
