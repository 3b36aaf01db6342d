//! PriceBar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily adjusted bar for a single symbol.
///
/// Every numeric field is a float, volume included: the upstream wire format
/// string-encodes all eight fields and promises nothing about integrality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: f64,
    pub dividend_amount: f64,
    pub split_coefficient: f64,
}

impl PriceBar {
    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.adjusted_close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Daily bars for one symbol, ascending by date.
///
/// An empty series is the "nothing usable arrived" sentinel: a failed fetch
/// stores one of these, and chart assembly skips it rather than erroring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// The empty sentinel series.
    pub fn empty() -> Self {
        Self { bars: Vec::new() }
    }

    /// Builds a series from bars in any order, sorting ascending by date.
    ///
    /// Dates are unique per symbol upstream (the wire format keys bars by
    /// date), so no dedup is attempted.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// (date, close) pairs in ascending date order.
    pub fn closes(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.bars.iter().map(|b| (b.date, b.close))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn sample_bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            adjusted_close: close,
            volume: 50_000.0,
            dividend_amount: 0.0,
            split_coefficient: 1.0,
        }
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar(2, 100.0).is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar(2, 100.0);
        bar.close = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn series_sorts_ascending() {
        let series = PriceSeries::from_bars(vec![
            sample_bar(5, 103.0),
            sample_bar(2, 100.0),
            sample_bar(3, 101.0),
        ]);
        let dates: Vec<u32> = series.bars().iter().map(|b| b.date.day()).collect();
        assert_eq!(dates, vec![2, 3, 5]);
        assert_eq!(series.first_date().unwrap().day(), 2);
        assert_eq!(series.last_date().unwrap().day(), 5);
    }

    #[test]
    fn empty_series_is_sentinel() {
        let series = PriceSeries::empty();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.first_date().is_none());
        assert!(series.closes().next().is_none());
    }

    #[test]
    fn closes_pairs_dates_with_closes() {
        let series = PriceSeries::from_bars(vec![sample_bar(2, 100.0), sample_bar(3, 101.0)]);
        let closes: Vec<f64> = series.closes().map(|(_, c)| c).collect();
        assert_eq!(closes, vec![100.0, 101.0]);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar(2, 100.0);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
