//! Alpha Vantage market data provider.
//!
//! Fetches the compact daily adjusted series (TIME_SERIES_DAILY_ADJUSTED).
//! Every numeric field arrives string-encoded under a numbered key. A payload
//! without the "Time Series (Daily)" key is an upstream refusal — unknown
//! symbol, throttling, or a bad API key — and the refusal text rides along in
//! one of three diagnostic fields.
//!
//! There is no retry or backoff here: one call is one request, and a failure
//! stands until the user triggers another pass.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, MarketDataProvider};
use crate::config::MarketDataConfig;
use crate::domain::{PriceBar, PriceSeries};

/// Daily-adjusted endpoint response. The series and the diagnostic strings
/// are mutually exclusive.
#[derive(Debug, Deserialize)]
struct DailyAdjustedResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, RawDailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// One day's fields, string-encoded under Alpha Vantage's numbered keys.
#[derive(Debug, Deserialize)]
struct RawDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
    #[serde(rename = "6. volume")]
    volume: String,
    #[serde(rename = "7. dividend amount")]
    dividend_amount: String,
    #[serde(rename = "8. split coefficient")]
    split_coefficient: String,
}

/// Alpha Vantage daily-adjusted provider.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(config: &MarketDataConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("optfolio/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        }
    }

    /// Parse a decoded response into an ascending series.
    ///
    /// Rows that fail the bar sanity check (NaN fields, inverted OHLC,
    /// non-positive prices) are dropped; the surviving rows form the series.
    fn parse_series(symbol: &str, resp: DailyAdjustedResponse) -> Result<PriceSeries, DataError> {
        let series = resp.series.ok_or_else(|| {
            let reason = resp
                .error_message
                .or(resp.note)
                .or(resp.information)
                .unwrap_or_else(|| "response carried no daily series and no explanation".into());
            DataError::SeriesUnavailable {
                symbol: symbol.to_string(),
                reason,
            }
        })?;

        let mut bars = Vec::with_capacity(series.len());
        for (date_key, raw) in &series {
            let date = NaiveDate::parse_from_str(date_key, "%Y-%m-%d").map_err(|e| {
                DataError::BadPayload {
                    symbol: symbol.to_string(),
                    detail: format!("bad date key '{date_key}': {e}"),
                }
            })?;

            let bar = PriceBar {
                date,
                open: parse_field(symbol, "1. open", &raw.open)?,
                high: parse_field(symbol, "2. high", &raw.high)?,
                low: parse_field(symbol, "3. low", &raw.low)?,
                close: parse_field(symbol, "4. close", &raw.close)?,
                adjusted_close: parse_field(symbol, "5. adjusted close", &raw.adjusted_close)?,
                volume: parse_field(symbol, "6. volume", &raw.volume)?,
                dividend_amount: parse_field(symbol, "7. dividend amount", &raw.dividend_amount)?,
                split_coefficient: parse_field(
                    symbol,
                    "8. split coefficient",
                    &raw.split_coefficient,
                )?,
            };

            // "nan" parses as a float, so parse_field alone cannot screen
            // placeholder rows.
            if bar.is_sane() {
                bars.push(bar);
            }
        }

        Ok(PriceSeries::from_bars(bars))
    }
}

fn parse_field(symbol: &str, key: &str, value: &str) -> Result<f64, DataError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| DataError::BadPayload {
            symbol: symbol.to_string(),
            detail: format!("non-numeric value '{value}' under '{key}'"),
        })
}

impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
                ("outputsize", "compact"),
            ])
            .send()
            .map_err(|e| DataError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Transport(format!("HTTP {status} for {symbol}")));
        }

        let decoded: DailyAdjustedResponse =
            resp.json().map_err(|e| DataError::BadPayload {
                symbol: symbol.to_string(),
                detail: e.to_string(),
            })?;

        Self::parse_series(symbol, decoded)
    }
}
