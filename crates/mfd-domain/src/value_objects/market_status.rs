//! Market status value objects

use serde::{Deserialize, Serialize};

/// Deserialized market information from the Nasdaq market-info feed.
///
/// Field names follow the upstream camelCase payload; all session times are
/// the human-readable Eastern-time strings the feed publishes (e.g.
/// `"Feb 23, 2026 09:30 AM ET"`).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatusData {
    /// Market country, e.g. `"U.S."`
    pub country: String,
    /// Machine-readable market state, e.g. `"Open"`
    pub market_indicator: String,
    /// Display variant of the market state, e.g. `"Market Open"`
    pub ui_market_indicator: String,
    /// Countdown text, e.g. `"Market Closes in 2H 30M"`
    pub market_count_down: String,
    /// Pre-market session opening time
    pub pre_market_opening_time: String,
    /// Pre-market session closing time
    pub pre_market_closing_time: String,
    /// Regular session opening time
    pub market_opening_time: String,
    /// Regular session closing time
    pub market_closing_time: String,
    /// After-hours session opening time
    pub after_hours_market_opening_time: String,
    /// After-hours session closing time
    pub after_hours_market_closing_time: String,
    /// Previous trade date, formatted `%b %d, %Y`
    pub previous_trade_date: String,
    /// Next trade date, formatted `%b %d, %Y`
    pub next_trade_date: String,
    /// Whether today is a business day
    pub is_business_day: bool,
    /// Raw market status string
    pub mrkt_status: String,
}
