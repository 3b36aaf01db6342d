//! End-to-end pipeline checks: wire payload → batch → aggregate → wording,
//! and fetch pass → series map → overlay.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use optfolio_core::{
    benchmark_delta, build_overlay, compute_aggregate, describe_benchmark_delta, fetch_symbols,
    DataError, MarketDataProvider, PriceBar, PriceSeries, SilentProgress, SimulationBatch,
};

fn weights_of(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
}

fn bar(day: u32, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        adjusted_close: close,
        volume: 25_000.0,
        dividend_amount: 0.0,
        split_coefficient: 1.0,
    }
}

// ── Aggregation worked example ───────────────────────────────────────

#[test]
fn worked_example_from_two_runs() {
    let batch = SimulationBatch::try_new(
        vec![0.1, 0.2],
        vec![0.05, 0.07],
        vec![1.2, 1.6],
        vec![
            weights_of(&[("AAPL", 1.0)]),
            weights_of(&[("AAPL", 0.5), ("MSFT", 0.5)]),
        ],
    )
    .unwrap();

    let agg = compute_aggregate(&batch, 1000.0).unwrap();

    assert!((agg.mean_return - 0.15).abs() < 1e-12);
    assert!((agg.expected_profit - 150.0).abs() < 1e-9);
    assert!((agg.averaged_weights["AAPL"] - 0.75).abs() < 1e-12);
    assert!((agg.averaged_weights["MSFT"] - 0.25).abs() < 1e-12);

    let delta = benchmark_delta(agg.mean_return * 100.0, 20.34);
    assert!((delta - (-5.34)).abs() < 1e-9);
    assert_eq!(
        describe_benchmark_delta(agg.mean_return * 100.0, 20.34, "S&P 500"),
        "lower than S&P 500 by 5.34%"
    );
}

#[test]
fn averaged_weights_use_full_run_count_as_divisor() {
    let batch = SimulationBatch::try_new(
        vec![0.1, 0.2],
        vec![0.05, 0.07],
        vec![1.0, 1.5],
        vec![
            weights_of(&[("AAPL", 0.6), ("MSFT", 0.4)]),
            weights_of(&[("AAPL", 0.2)]),
        ],
    )
    .unwrap();

    let agg = compute_aggregate(&batch, 1000.0).unwrap();

    // MSFT's absence from the second run contributes zero; the divisor
    // stays 2.
    assert!((agg.averaged_weights["AAPL"] - 0.4).abs() < 1e-12);
    assert!((agg.averaged_weights["MSFT"] - 0.2).abs() < 1e-12);
}

// ── Wire payload → batch → aggregate ─────────────────────────────────

#[test]
fn simulation_wire_payload_flows_through_to_statistics() {
    // The service's body shape: a bare four-element array.
    let payload = r#"[
        [0.1, 0.2],
        [0.05, 0.07],
        [1.2, 1.6],
        [{"AAPL": 1.0}, {"AAPL": 0.5, "MSFT": 0.5}]
    ]"#;

    type Wire = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<BTreeMap<String, f64>>);
    let (returns, volatility, sharpe, weights): Wire = serde_json::from_str(payload).unwrap();
    let batch = SimulationBatch::try_new(returns, volatility, sharpe, weights).unwrap();

    let agg = compute_aggregate(&batch, 1000.0).unwrap();
    assert!((agg.mean_return - 0.15).abs() < 1e-12);
    assert!((agg.expected_profit - 150.0).abs() < 1e-9);
    assert_eq!(agg.cumulative_value_trajectory.len(), 2);
}

// ── Fetch pass → overlay ─────────────────────────────────────────────

/// Serves a fixed two-bar series for known symbols and refuses the rest.
struct CannedProvider {
    known: Vec<&'static str>,
}

impl MarketDataProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        if self.known.contains(&symbol) {
            Ok(PriceSeries::from_bars(vec![bar(2, 100.0), bar(3, 102.0)]))
        } else {
            Err(DataError::SeriesUnavailable {
                symbol: symbol.to_string(),
                reason: "unknown symbol".to_string(),
            })
        }
    }
}

#[test]
fn failed_fetch_is_omitted_from_the_overlay() {
    let provider = CannedProvider { known: vec!["AAPL"] };
    let symbols = vec!["AAPL".to_string(), "XOM".to_string()];

    let (series_by_symbol, summary) = fetch_symbols(&provider, &symbols, &SilentProgress);

    // The fetch step reports the failure; the overlay step stays silent.
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors[0].0, "XOM");

    let overlay = build_overlay(&series_by_symbol);
    assert_eq!(overlay.lines.len(), 1);
    assert_eq!(overlay.lines[0].symbol, "AAPL");
}

#[test]
fn overlay_bounds_follow_the_surviving_lines() {
    let provider = CannedProvider {
        known: vec!["AAPL", "MSFT"],
    };
    let symbols = vec![
        "AAPL".to_string(),
        "MSFT".to_string(),
        "ZZZZ".to_string(),
    ];

    let (series_by_symbol, _) = fetch_symbols(&provider, &symbols, &SilentProgress);
    let overlay = build_overlay(&series_by_symbol);

    assert_eq!(overlay.lines.len(), 2);
    let (min_date, max_date) = overlay.date_bounds.unwrap();
    assert_eq!(min_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(max_date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    let (min_close, max_close) = overlay.close_bounds.unwrap();
    assert_eq!(min_close, 100.0);
    assert_eq!(max_close, 102.0);
}
