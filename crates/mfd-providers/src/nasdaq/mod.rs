//! Nasdaq feed adapter and services

/// Low-level Nasdaq API client
pub mod client;
/// Market status and trading-calendar service
pub mod market_status;

pub use client::NasdaqClient;
pub use market_status::MarketStatus;
