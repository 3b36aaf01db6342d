//! SimulationBatch — parallel per-run outputs from the optimization service.

use std::collections::BTreeMap;

use thiserror::Error;

/// A batch whose four parallel sequences disagree in length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct MalformedBatch(pub String);

/// One batch of simulation outputs: four sequences indexed by run.
///
/// `weights()[i]` maps ticker → allocation fraction for run `i`. A run's map
/// may omit tickers entirely, and the fractions carry no sum-to-one promise;
/// the service reports whatever its optimizer produced.
///
/// Constructed only through [`SimulationBatch::try_new`], which enforces the
/// equal-length invariant, so `len()` is well-defined over all four views.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationBatch {
    returns: Vec<f64>,
    volatility: Vec<f64>,
    sharpe: Vec<f64>,
    weights: Vec<BTreeMap<String, f64>>,
}

impl SimulationBatch {
    /// Validates the equal-length invariant and builds a batch.
    pub fn try_new(
        returns: Vec<f64>,
        volatility: Vec<f64>,
        sharpe: Vec<f64>,
        weights: Vec<BTreeMap<String, f64>>,
    ) -> Result<Self, MalformedBatch> {
        let n = returns.len();
        if volatility.len() != n || sharpe.len() != n || weights.len() != n {
            return Err(MalformedBatch(format!(
                "ragged simulation batch: returns={}, volatility={}, sharpe={}, weights={}",
                n,
                volatility.len(),
                sharpe.len(),
                weights.len()
            )));
        }
        Ok(Self {
            returns,
            volatility,
            sharpe,
            weights,
        })
    }

    /// Number of simulation runs in the batch.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Annualized return per run, as fractions (0.15 = 15%).
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Volatility per run.
    pub fn volatility(&self) -> &[f64] {
        &self.volatility
    }

    /// Sharpe ratio per run.
    pub fn sharpe(&self) -> &[f64] {
        &self.sharpe
    }

    /// Ticker → allocation fraction, per run.
    pub fn weights(&self) -> &[BTreeMap<String, f64>] {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights_of(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn try_new_accepts_equal_lengths() {
        let batch = SimulationBatch::try_new(
            vec![0.1, 0.2],
            vec![0.05, 0.07],
            vec![1.0, 1.5],
            vec![weights_of(&[("AAPL", 1.0)]), weights_of(&[("MSFT", 0.5)])],
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
    }

    #[test]
    fn try_new_rejects_ragged_lengths() {
        let err = SimulationBatch::try_new(
            vec![0.1, 0.2],
            vec![0.05],
            vec![1.0, 1.5],
            vec![weights_of(&[]), weights_of(&[])],
        )
        .unwrap_err();
        assert!(err.0.contains("ragged"));
        assert!(err.0.contains("volatility=1"));
    }

    #[test]
    fn try_new_accepts_empty_batch() {
        // Emptiness is legal at the type level; aggregation rejects it later.
        let batch = SimulationBatch::try_new(vec![], vec![], vec![], vec![]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn weight_maps_need_not_cover_all_tickers() {
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
        assert_eq!(batch.weights()[1].len(), 1);
        assert!(!batch.weights()[1].contains_key("MSFT"));
    }
}
