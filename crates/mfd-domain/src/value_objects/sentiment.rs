//! Market sentiment value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single measurement of the Fear & Greed index or one of its components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FngReading {
    /// The date and time the reading was recorded
    pub date: DateTime<Utc>,
    /// The numerical value of the index (typically 0.0 to 100.0)
    pub value: f64,
    /// The market sentiment rating associated with the value
    pub rating: String,
}

/// Comprehensive status of the Fear & Greed index including sub-indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FearGreedSnapshot {
    /// The primary Fear & Greed index reading
    pub current: FngReading,
    /// Historical readings extracted from the index graph
    pub history: Vec<FngReading>,
    /// Market Momentum (S&P 500 vs 125-day moving average)
    pub market_momentum: FngReading,
    /// Stock Price Strength (net new highs vs lows)
    pub stock_price_strength: FngReading,
    /// Stock Price Breadth (McClellan Summation Index)
    pub stock_price_breadth: FngReading,
    /// Put and Call Options (put/call ratio)
    pub put_call_options: FngReading,
    /// Previous market close index value
    pub previous_close: f64,
    /// Average index value from one week ago
    pub previous_1_week: f64,
}
