//! Nasdaq market status service
//!
//! High-level methods to fetch market data and calculate operational
//! timings. Designed to be used by an orchestrator to manage polling
//! intervals and execution timing.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::US::Eastern;
use mfd_domain::{Error, MarketStatusData, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::http::RetryOptions;
use crate::nasdaq::client::NasdaqClient;

/// Regular session opening time, US/Eastern
const SESSION_OPEN: (u32, u32) = (9, 30);
/// Regular session closing time, US/Eastern
const SESSION_CLOSE: (u32, u32) = (16, 0);
/// Date format used by the Nasdaq feed, e.g. "Feb 24, 2026"
const TRADE_DATE_FORMAT: &str = "%b %d, %Y";

/// Service to fetch and analyze Nasdaq market status.
pub struct MarketStatus {
    api: NasdaqClient,
}

impl Default for MarketStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketStatus {
    /// Create a service against the production Nasdaq API
    pub fn new() -> Self {
        Self {
            api: NasdaqClient::new(),
        }
    }

    /// Create a service on top of an existing client (e.g. one pointed at a
    /// mock server)
    pub fn with_client(api: NasdaqClient) -> Self {
        Self { api }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/market-info/", self.api.base_url())
    }

    /// Fetch the raw JSON response from the market-info endpoint
    pub async fn fetch_raw(&self, options: Option<RetryOptions>) -> Result<Value> {
        self.api.call(&self.endpoint(), options).await
    }

    /// Fetch and deserialize the market status into typed data
    pub async fn fetch_status(&self, options: Option<RetryOptions>) -> Result<MarketStatusData> {
        let json = self.fetch_raw(options).await?;

        let data = json.get("data").ok_or_else(|| Error::MalformedResponse {
            endpoint: self.endpoint(),
            details: "Missing 'data' field".to_string(),
        })?;

        serde_json::from_value(data.clone()).map_err(|e| {
            warn!(error = %e, "deserialization error in market status");
            Error::MalformedResponse {
                endpoint: self.endpoint(),
                details: format!("JSON error: {e}"),
            }
        })
    }

    /// Whether the market is currently in the regular trading session.
    ///
    /// Checks that today is a business day and that the current Eastern time
    /// is between 09:30 and 16:00.
    pub fn is_regular_session(&self, status: &MarketStatusData) -> bool {
        if !status.is_business_day {
            return false;
        }
        let now = Utc::now().with_timezone(&Eastern).time();
        let open = NaiveTime::from_hms_opt(SESSION_OPEN.0, SESSION_OPEN.1, 0).unwrap();
        let close = NaiveTime::from_hms_opt(SESSION_CLOSE.0, SESSION_CLOSE.1, 0).unwrap();

        now >= open && now < close
    }

    /// The precise duration until the next market opening.
    ///
    /// # Errors
    /// Returns [`Error::MalformedResponse`] if the date string from the feed
    /// cannot be parsed, and [`Error::Internal`] on an ambiguous timezone
    /// conversion.
    pub fn next_opening_delay(&self, status: &MarketStatusData) -> Result<std::time::Duration> {
        let now = Utc::now().with_timezone(&Eastern);

        let date = NaiveDate::parse_from_str(&status.next_trade_date, TRADE_DATE_FORMAT).map_err(
            |e| Error::MalformedResponse {
                endpoint: self.endpoint(),
                details: format!(
                    "Date parsing failed for '{}': {e}",
                    status.next_trade_date
                ),
            },
        )?;

        let target_naive = date
            .and_hms_opt(SESSION_OPEN.0, SESSION_OPEN.1, 0)
            .ok_or_else(|| Error::internal("Invalid session opening time"))?;
        let target = Eastern
            .from_local_datetime(&target_naive)
            .single()
            .ok_or_else(|| {
                Error::internal("Ambiguous timezone conversion during market open calculation")
            })?;

        let secs = target.signed_duration_since(now).num_seconds();
        if secs > 0 {
            Ok(std::time::Duration::from_secs(secs as u64))
        } else {
            // The recorded next trade date already passed; a zero duration
            // tells the caller to refresh its data.
            Ok(std::time::Duration::ZERO)
        }
    }

    /// Block the current task until the market opens.
    ///
    /// If the market is already open or the delay cannot be calculated, this
    /// returns immediately.
    pub async fn wait_until_open(&self, status: &MarketStatusData) {
        if let Ok(delay) = self.next_opening_delay(status)
            && delay.as_secs() > 0
        {
            info!(
                wait_time = format_duration(
                    ChronoDuration::from_std(delay).unwrap_or_else(|_| ChronoDuration::zero())
                ),
                "market transition: waiting for opening"
            );
            tokio::time::sleep(delay).await;
            info!("market opening time reached");
        }
    }
}

/// Format a chrono duration as HH:MM:SS
pub fn format_duration(dur: ChronoDuration) -> String {
    let secs = dur.num_seconds().abs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
