//! CNN Fear & Greed index service
//!
//! High-level interface for retrieving the CNN Fear & Greed index:
//! current status, historical graph data, and sub-indicators, transformed
//! from the raw API shape into domain value objects.

use chrono::{DateTime, TimeZone, Utc};
use mfd_domain::{Error, FearGreedSnapshot, FngReading, Result};
use serde_json::Value;

use crate::cnn::client::CnnClient;
use crate::http::RetryOptions;

/// Service orchestrator for CNN Fear & Greed data retrieval.
pub struct FearGreed {
    api: CnnClient,
}

impl Default for FearGreed {
    fn default() -> Self {
        Self::new()
    }
}

impl FearGreed {
    /// Create a service against the production CNN dataviz API
    pub fn new() -> Self {
        Self {
            api: CnnClient::new(),
        }
    }

    /// Create a service on top of an existing client (e.g. one pointed at a
    /// mock server)
    pub fn with_client(api: CnnClient) -> Self {
        Self { api }
    }

    fn graphdata_url(&self) -> String {
        format!("{}/index/fearandgreed/graphdata", self.api.base_url())
    }

    /// Fetch the latest Fear & Greed index and sub-indicators.
    ///
    /// Uses the base `graphdata` endpoint, which contains both the current
    /// status and a 125-day historical window.
    pub async fn fetch_latest(&self, options: Option<RetryOptions>) -> Result<FearGreedSnapshot> {
        let url = self.graphdata_url();
        let raw = self.api.call(&url, options).await?;
        map_response(raw, &url)
    }

    /// Fetch historical Fear & Greed data for a specific date.
    ///
    /// # Arguments
    /// * `date` - The target date in `%Y-%m-%d` format.
    pub async fn fetch_at_date(
        &self,
        date: &str,
        options: Option<RetryOptions>,
    ) -> Result<FearGreedSnapshot> {
        let url = format!("{}/{date}", self.graphdata_url());
        let raw = self.api.call(&url, options).await?;
        map_response(raw, &url)
    }
}

/// Map a raw graphdata JSON response into a typed [`FearGreedSnapshot`].
///
/// The historical series arrives as `x` (epoch milliseconds) / `y` (value)
/// pairs; sub-indicator blocks carry epoch-millisecond `timestamp` fields.
fn map_response(json: Value, url: &str) -> Result<FearGreedSnapshot> {
    let extract_indicator = |key: &str| -> FngReading {
        let block = &json[key];
        FngReading {
            date: block["timestamp"]
                .as_f64()
                .and_then(|ts| Utc.timestamp_millis_opt(ts as i64).single())
                .unwrap_or_else(Utc::now),
            value: block["score"].as_f64().unwrap_or(0.0),
            rating: block["rating"].as_str().unwrap_or("unknown").to_string(),
        }
    };

    let primary = json
        .get("fear_and_greed")
        .ok_or_else(|| Error::MalformedResponse {
            endpoint: url.to_string(),
            details: "Missing 'fear_and_greed' root key".to_string(),
        })?;

    let current = FngReading {
        date: primary["timestamp"]
            .as_str()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
        value: primary["score"].as_f64().unwrap_or(0.0),
        rating: primary["rating"].as_str().unwrap_or("unknown").to_string(),
    };

    let mut history = Vec::new();
    if let Some(points) = json["fear_and_greed_historical"]["data"].as_array() {
        for point in points {
            if let (Some(x), Some(y)) = (point["x"].as_f64(), point["y"].as_f64())
                && let Some(date) = Utc.timestamp_millis_opt(x as i64).single()
            {
                history.push(FngReading {
                    date,
                    value: y,
                    rating: point["rating"].as_str().unwrap_or("").to_string(),
                });
            }
        }
    }

    Ok(FearGreedSnapshot {
        current,
        history,
        market_momentum: extract_indicator("market_momentum_sp500"),
        stock_price_strength: extract_indicator("stock_price_strength"),
        stock_price_breadth: extract_indicator("stock_price_breadth"),
        put_call_options: extract_indicator("put_call_options"),
        previous_close: primary["previous_close"].as_f64().unwrap_or(0.0),
        previous_1_week: primary["previous_1_week"].as_f64().unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "fear_and_greed": {
                "timestamp": "2026-02-23T16:00:00+00:00",
                "score": 37.5,
                "rating": "fear",
                "previous_close": 41.0,
                "previous_1_week": 55.2
            },
            "fear_and_greed_historical": {
                "data": [
                    { "x": 1_771_200_000_000.0f64, "y": 52.0, "rating": "neutral" },
                    { "x": 1_771_286_400_000.0f64, "y": 48.5, "rating": "neutral" }
                ]
            },
            "market_momentum_sp500": {
                "timestamp": 1_771_286_400_000.0f64,
                "score": 60.1,
                "rating": "greed"
            },
            "stock_price_strength": { "timestamp": 1_771_286_400_000.0f64, "score": 22.0, "rating": "extreme fear" },
            "stock_price_breadth": { "timestamp": 1_771_286_400_000.0f64, "score": 30.0, "rating": "fear" },
            "put_call_options": { "timestamp": 1_771_286_400_000.0f64, "score": 70.0, "rating": "greed" }
        })
    }

    #[test]
    fn maps_full_payload() {
        let snapshot = map_response(sample_payload(), "https://example.com/graphdata").unwrap();
        assert_eq!(snapshot.current.value, 37.5);
        assert_eq!(snapshot.current.rating, "fear");
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[1].value, 48.5);
        assert_eq!(snapshot.market_momentum.rating, "greed");
        assert_eq!(snapshot.previous_close, 41.0);
        assert_eq!(snapshot.previous_1_week, 55.2);
    }

    #[test]
    fn missing_primary_block_is_malformed() {
        let err = map_response(json!({}), "https://example.com/graphdata").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn unparseable_fields_fall_back_to_defaults() {
        let snapshot = map_response(
            json!({ "fear_and_greed": { "score": "not-a-number" } }),
            "https://example.com/graphdata",
        )
        .unwrap();
        assert_eq!(snapshot.current.value, 0.0);
        assert_eq!(snapshot.current.rating, "unknown");
        assert!(snapshot.history.is_empty());
    }
}
