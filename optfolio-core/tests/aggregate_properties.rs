//! Property tests for the aggregation pipeline.
//!
//! Uses proptest to verify:
//! 1. The value trajectory has one point per run, and its first point is
//!    invest_amount × (1 + returns[0] / PERIODS_PER_YEAR)
//! 2. mean_return and mean_volatility agree with directly computed
//!    arithmetic means to within 1e-9
//! 3. expected_profit is exactly invest_amount × mean_return
//! 4. Averaged weights cover the union of tickers across runs and stay
//!    inside the input band
//! 5. The empty batch is always refused before any arithmetic

use std::collections::BTreeMap;

use proptest::prelude::*;

use optfolio_core::{compute_aggregate, AggregateError, SimulationBatch, PERIODS_PER_YEAR};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_return() -> impl Strategy<Value = f64> {
    -0.9..0.9_f64
}

fn arb_volatility() -> impl Strategy<Value = f64> {
    0.0..0.5_f64
}

fn arb_weight_map() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::btree_map(
        prop::sample::select(vec!["AAPL", "XOM", "MSFT", "NEE", "GS"]).prop_map(String::from),
        0.0..=1.0_f64,
        0..4,
    )
}

fn arb_batch(max_runs: usize) -> impl Strategy<Value = SimulationBatch> {
    (1..=max_runs).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_return(), n),
            prop::collection::vec(arb_volatility(), n),
            prop::collection::vec(-3.0..3.0_f64, n),
            prop::collection::vec(arb_weight_map(), n),
        )
            .prop_map(|(returns, volatility, sharpe, weights)| {
                SimulationBatch::try_new(returns, volatility, sharpe, weights)
                    .expect("generated sequences share one length")
            })
    })
}

// ── 1 & 3. Trajectory shape and profit identity ──────────────────────

proptest! {
    /// One trajectory point per run; the first point compounds the first
    /// return scaled by the fixed periods divisor.
    #[test]
    fn trajectory_has_n_points_and_compounds_first_return(
        batch in arb_batch(64),
        invest in 100.0..1_000_000.0_f64,
    ) {
        let agg = compute_aggregate(&batch, invest).unwrap();

        prop_assert_eq!(agg.cumulative_value_trajectory.len(), batch.len());

        let ratio = agg.cumulative_value_trajectory[0] / invest;
        let expected = 1.0 + batch.returns()[0] / PERIODS_PER_YEAR;
        prop_assert!(
            (ratio - expected).abs() < 1e-9,
            "trajectory[0]/invest = {ratio}, expected {expected}"
        );
    }

    /// expected_profit is exactly the mean return scaled by the amount.
    #[test]
    fn expected_profit_identity(
        batch in arb_batch(64),
        invest in 100.0..1_000_000.0_f64,
    ) {
        let agg = compute_aggregate(&batch, invest).unwrap();
        let direct = invest * agg.mean_return;
        prop_assert!(
            (agg.expected_profit - direct).abs() < 1e-9,
            "expected_profit {} != invest × mean_return {}",
            agg.expected_profit,
            direct
        );
    }
}

// ── 2. Mean agreement ─────────────────────────────────────────────────

proptest! {
    /// The reported means match the arithmetic means of the inputs.
    #[test]
    fn means_agree_with_direct_computation(batch in arb_batch(64)) {
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        let n = batch.len() as f64;

        let direct_return = batch.returns().iter().sum::<f64>() / n;
        let direct_vol = batch.volatility().iter().sum::<f64>() / n;

        prop_assert!((agg.mean_return - direct_return).abs() < 1e-9);
        prop_assert!((agg.mean_volatility - direct_vol).abs() < 1e-9);
    }
}

// ── 4. Averaged weights ──────────────────────────────────────────────

proptest! {
    /// Every ticker seen in any run appears in the output; nothing else
    /// does. With per-run weights in [0, 1], each average stays in [0, 1]
    /// because the divisor is the full run count.
    #[test]
    fn averaged_weights_cover_union_and_stay_bounded(batch in arb_batch(32)) {
        let agg = compute_aggregate(&batch, 1000.0).unwrap();

        let mut union: Vec<&String> = batch.weights().iter().flat_map(|m| m.keys()).collect();
        union.sort();
        union.dedup();

        prop_assert_eq!(agg.averaged_weights.len(), union.len());
        for ticker in union {
            prop_assert!(agg.averaged_weights.contains_key(ticker));
        }
        for (ticker, avg) in &agg.averaged_weights {
            prop_assert!(
                (0.0..=1.0).contains(avg),
                "averaged weight for {} out of band: {}",
                ticker,
                avg
            );
        }
    }

    /// Dividing by n: each average equals the per-ticker sum over the
    /// fixed run count, with absent runs contributing zero.
    #[test]
    fn averaged_weights_divide_by_run_count(batch in arb_batch(32)) {
        let agg = compute_aggregate(&batch, 1000.0).unwrap();
        let n = batch.len() as f64;

        for (ticker, avg) in &agg.averaged_weights {
            let sum: f64 = batch
                .weights()
                .iter()
                .filter_map(|m| m.get(ticker))
                .sum();
            prop_assert!(
                (avg - sum / n).abs() < 1e-9,
                "{}: avg {} != sum {} / n {}",
                ticker,
                avg,
                sum,
                n
            );
        }
    }
}

// ── 5. Degenerate input ──────────────────────────────────────────────

#[test]
fn empty_batch_is_refused() {
    let batch = SimulationBatch::try_new(vec![], vec![], vec![], vec![]).unwrap();
    assert_eq!(
        compute_aggregate(&batch, 1000.0).unwrap_err(),
        AggregateError::EmptyBatch
    );
}
