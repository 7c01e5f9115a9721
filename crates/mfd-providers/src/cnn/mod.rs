//! CNN Business feed adapter and services

/// Low-level CNN API client
pub mod client;
/// Fear & Greed index service
pub mod fear_greed;

pub use client::CnnClient;
pub use fear_greed::FearGreed;
