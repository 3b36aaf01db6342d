//! Batch aggregation — pure functions that turn simulation output into
//! display-ready statistics.
//!
//! Everything here is a pure function: batch and invest amount in,
//! [`AggregateResult`] out. No dependencies on the clients or the dashboard.
//! A result is computed once per fetched batch and discarded when the user
//! issues the next request; nothing is cached.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::SimulationBatch;

/// Compounding periods per trading year for the value trajectory:
/// 252 trading days of 20 thirty-minute intervals each.
///
/// Each simulation run's annualized return is scaled down by this divisor
/// before compounding, so the trajectory reads as one period per run.
pub const PERIODS_PER_YEAR: f64 = 5040.0;

/// Errors surfaced while aggregating a batch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AggregateError {
    /// The service returned zero runs. Guarded before any arithmetic; the
    /// division by n would otherwise produce NaN statistics.
    #[error("simulation batch is empty; nothing to aggregate")]
    EmptyBatch,

    /// A run carried a non-finite value. The whole computation fails; no
    /// partial aggregate is produced.
    #[error("malformed simulation batch: {0}")]
    Malformed(String),
}

/// Read-only summary computed once from a [`SimulationBatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Arithmetic mean of per-run annualized returns, as a fraction
    /// (0.08 = 8%).
    pub mean_return: f64,

    /// Arithmetic mean of per-run volatility.
    pub mean_volatility: f64,

    /// `invest_amount × mean_return`.
    pub expected_profit: f64,

    /// Portfolio value compounded run by run, one element per run:
    /// `v[0] = invest_amount × (1 + returns[0] / periods)`,
    /// `v[i] = v[i-1] × (1 + returns[i] / periods)`.
    pub cumulative_value_trajectory: Vec<f64>,

    /// Mean allocation per ticker across all n runs. A ticker absent from a
    /// run's map contributes 0 for that run; the divisor is always n.
    pub averaged_weights: BTreeMap<String, f64>,
}

/// Aggregates a batch with the default [`PERIODS_PER_YEAR`] divisor.
///
/// `invest_amount` must be positive; the dashboard's bounded form makes a
/// violation unreachable, so this is a documented precondition rather than
/// an error case.
pub fn compute_aggregate(
    batch: &SimulationBatch,
    invest_amount: f64,
) -> Result<AggregateResult, AggregateError> {
    compute_aggregate_with_periods(batch, invest_amount, PERIODS_PER_YEAR)
}

/// Same as [`compute_aggregate`] with an explicit compounding divisor.
pub fn compute_aggregate_with_periods(
    batch: &SimulationBatch,
    invest_amount: f64,
    periods_per_year: f64,
) -> Result<AggregateResult, AggregateError> {
    debug_assert!(invest_amount > 0.0, "invest_amount must be positive");

    if batch.is_empty() {
        return Err(AggregateError::EmptyBatch);
    }
    reject_non_finite(batch)?;

    let n = batch.len() as f64;

    let mean_return = batch.returns().iter().sum::<f64>() / n;
    let mean_volatility = batch.volatility().iter().sum::<f64>() / n;
    let expected_profit = invest_amount * mean_return;

    // One trajectory point per run, compounding the scaled per-run return.
    let mut trajectory = Vec::with_capacity(batch.len());
    let mut value = invest_amount;
    for r in batch.returns() {
        value *= 1.0 + r / periods_per_year;
        trajectory.push(value);
    }

    // Fold-sum over the union of ticker keys, then divide by n. An absent
    // key contributes 0 to its sum; the divisor stays n, never a per-key
    // occurrence count.
    let mut averaged_weights: BTreeMap<String, f64> = BTreeMap::new();
    for run in batch.weights() {
        for (ticker, fraction) in run {
            *averaged_weights.entry(ticker.clone()).or_insert(0.0) += fraction;
        }
    }
    for sum in averaged_weights.values_mut() {
        *sum /= n;
    }

    Ok(AggregateResult {
        mean_return,
        mean_volatility,
        expected_profit,
        cumulative_value_trajectory: trajectory,
        averaged_weights,
    })
}

fn reject_non_finite(batch: &SimulationBatch) -> Result<(), AggregateError> {
    for (name, values) in [
        ("returns", batch.returns()),
        ("volatility", batch.volatility()),
        ("sharpe", batch.sharpe()),
    ] {
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(AggregateError::Malformed(format!(
                "non-finite {name} value at run {i}"
            )));
        }
    }
    for (i, run) in batch.weights().iter().enumerate() {
        if let Some((ticker, _)) = run.iter().find(|(_, w)| !w.is_finite()) {
            return Err(AggregateError::Malformed(format!(
                "non-finite weight for '{ticker}' at run {i}"
            )));
        }
    }
    Ok(())
}

// ─── Benchmark comparison ───────────────────────────────────────────

/// Signed distance of the portfolio's mean return from the benchmark,
/// both in percent.
pub fn benchmark_delta(mean_return_pct: f64, benchmark_pct: f64) -> f64 {
    mean_return_pct - benchmark_pct
}

/// Renders the comparison sentence shown in the results summary:
/// "higher than S&P 500 by 2.10%" / "lower than S&P 500 by 5.34%".
pub fn describe_benchmark_delta(
    mean_return_pct: f64,
    benchmark_pct: f64,
    benchmark_label: &str,
) -> String {
    let delta = benchmark_delta(mean_return_pct, benchmark_pct);
    let direction = if delta >= 0.0 { "higher" } else { "lower" };
    format!(
        "{direction} than {benchmark_label} by {:.2}%",
        delta.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_of(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    fn batch_of(returns: Vec<f64>, volatility: Vec<f64>) -> SimulationBatch {
        let n = returns.len();
        SimulationBatch::try_new(
            returns,
            volatility,
            vec![1.0; n],
            vec![BTreeMap::new(); n],
        )
        .unwrap()
    }

    // ── Empty batch ──

    #[test]
    fn empty_batch_is_rejected_before_any_division() {
        let batch = SimulationBatch::try_new(vec![], vec![], vec![], vec![]).unwrap();
        let err = compute_aggregate(&batch, 1000.0).unwrap_err();
        assert_eq!(err, AggregateError::EmptyBatch);
    }

    // ── Means ──

    #[test]
    fn means_are_arithmetic_means() {
        let batch = batch_of(vec![0.1, 0.2, 0.3], vec![0.05, 0.07, 0.09]);
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        assert!((agg.mean_return - 0.2).abs() < 1e-12);
        assert!((agg.mean_volatility - 0.07).abs() < 1e-12);
    }

    #[test]
    fn expected_profit_scales_mean_return_by_invest_amount() {
        let batch = batch_of(vec![0.1, 0.2], vec![0.05, 0.07]);
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        assert!((agg.mean_return - 0.15).abs() < 1e-12);
        assert!((agg.expected_profit - 150.0).abs() < 1e-9);
    }

    // ── Trajectory ──

    #[test]
    fn trajectory_has_one_point_per_run() {
        let batch = batch_of(vec![0.1; 7], vec![0.05; 7]);
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        assert_eq!(agg.cumulative_value_trajectory.len(), 7);
    }

    #[test]
    fn trajectory_first_point_compounds_from_invest_amount() {
        let batch = batch_of(vec![0.1, 0.2], vec![0.05, 0.07]);
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        let expected = 1000.0 * (1.0 + 0.1 / PERIODS_PER_YEAR);
        assert!((agg.cumulative_value_trajectory[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn trajectory_compounds_step_by_step() {
        let batch = batch_of(vec![0.1, 0.2, -0.05], vec![0.05; 3]);
        let agg = compute_aggregate(&batch, 500.0).unwrap();
        let t = &agg.cumulative_value_trajectory;
        let v0 = 500.0 * (1.0 + 0.1 / PERIODS_PER_YEAR);
        let v1 = v0 * (1.0 + 0.2 / PERIODS_PER_YEAR);
        let v2 = v1 * (1.0 - 0.05 / PERIODS_PER_YEAR);
        assert!((t[0] - v0).abs() < 1e-9);
        assert!((t[1] - v1).abs() < 1e-9);
        assert!((t[2] - v2).abs() < 1e-9);
    }

    #[test]
    fn explicit_periods_divisor_is_honored() {
        let batch = batch_of(vec![0.5], vec![0.1]);
        let agg = compute_aggregate_with_periods(&batch, 100.0, 2.0).unwrap();
        // 100 × (1 + 0.5/2) = 125
        assert!((agg.cumulative_value_trajectory[0] - 125.0).abs() < 1e-9);
    }

    // ── Averaged weights ──

    #[test]
    fn absent_ticker_contributes_zero_and_divisor_stays_n() {
        // MSFT appears in one of two runs: its average is 0.4/2 = 0.2,
        // not 0.4/1.
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
        assert!((agg.averaged_weights["AAPL"] - 0.4).abs() < 1e-12);
        assert!((agg.averaged_weights["MSFT"] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn weights_key_union_is_discovered_across_runs() {
        let batch = SimulationBatch::try_new(
            vec![0.1, 0.2, 0.3],
            vec![0.05, 0.07, 0.09],
            vec![1.0, 1.5, 2.0],
            vec![
                weights_of(&[("AAPL", 0.9)]),
                weights_of(&[("XOM", 0.6)]),
                weights_of(&[("GS", 0.3)]),
            ],
        )
        .unwrap();
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        assert_eq!(agg.averaged_weights.len(), 3);
        assert!((agg.averaged_weights["AAPL"] - 0.3).abs() < 1e-12);
        assert!((agg.averaged_weights["XOM"] - 0.2).abs() < 1e-12);
        assert!((agg.averaged_weights["GS"] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn weights_iteration_is_ticker_ordered() {
        let batch = SimulationBatch::try_new(
            vec![0.1],
            vec![0.05],
            vec![1.0],
            vec![weights_of(&[("XOM", 0.3), ("AAPL", 0.5), ("MSFT", 0.2)])],
        )
        .unwrap();
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        let tickers: Vec<&str> = agg.averaged_weights.keys().map(|s| s.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "XOM"]);
    }

    // ── Non-finite rejection ──

    #[test]
    fn nan_return_is_malformed() {
        let batch = batch_of(vec![0.1, f64::NAN], vec![0.05, 0.07]);
        let err = compute_aggregate(&batch, 1000.0).unwrap_err();
        match err {
            AggregateError::Malformed(msg) => {
                assert!(msg.contains("returns"));
                assert!(msg.contains("run 1"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn infinite_volatility_is_malformed() {
        let batch = batch_of(vec![0.1, 0.2], vec![0.05, f64::INFINITY]);
        assert!(matches!(
            compute_aggregate(&batch, 1000.0),
            Err(AggregateError::Malformed(_))
        ));
    }

    #[test]
    fn nan_weight_is_malformed() {
        let batch = SimulationBatch::try_new(
            vec![0.1],
            vec![0.05],
            vec![1.0],
            vec![weights_of(&[("AAPL", f64::NAN)])],
        )
        .unwrap();
        let err = compute_aggregate(&batch, 1000.0).unwrap_err();
        match err {
            AggregateError::Malformed(msg) => assert!(msg.contains("AAPL")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    // ── Benchmark ──

    #[test]
    fn benchmark_delta_is_signed() {
        assert!((benchmark_delta(15.0, 20.34) - (-5.34)).abs() < 1e-9);
        assert!((benchmark_delta(22.44, 20.34) - 2.1).abs() < 1e-9);
    }

    #[test]
    fn benchmark_wording_follows_sign() {
        assert_eq!(
            describe_benchmark_delta(15.0, 20.34, "S&P 500"),
            "lower than S&P 500 by 5.34%"
        );
        assert_eq!(
            describe_benchmark_delta(22.44, 20.34, "S&P 500"),
            "higher than S&P 500 by 2.10%"
        );
    }

    #[test]
    fn benchmark_label_is_caller_supplied() {
        assert_eq!(
            describe_benchmark_delta(10.0, 8.0, "FTSE 100"),
            "higher than FTSE 100 by 2.00%"
        );
    }
}
