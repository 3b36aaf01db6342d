//! Sequential multi-symbol fetch over one provider.
//!
//! Symbols are fetched strictly in the order given, one request at a time.
//! A failed symbol is recorded and replaced with an empty series so the
//! rest of the pass continues; downstream overlay assembly skips empty
//! series on its own.

use std::collections::BTreeMap;

use super::provider::{DataError, FetchProgress, MarketDataProvider};
use crate::domain::PriceSeries;

/// Outcome of one fetch pass.
#[derive(Debug)]
pub struct FetchSummary {
    /// Symbols requested.
    pub total: usize,

    /// Symbols that produced a usable series.
    pub succeeded: usize,

    /// Symbols that failed.
    pub failed: usize,

    /// Per-symbol failures, in request order.
    pub errors: Vec<(String, DataError)>,
}

impl FetchSummary {
    /// True when every requested symbol produced a series.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetches daily series for every symbol in `symbols`, in order.
///
/// The returned map holds one entry per requested symbol. Failures map to
/// [`PriceSeries::empty`] and are listed in the summary; they never abort
/// the remaining symbols.
pub fn fetch_symbols(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
    progress: &dyn FetchProgress,
) -> (BTreeMap<String, PriceSeries>, FetchSummary) {
    let total = symbols.len();
    let mut series_by_symbol = BTreeMap::new();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut errors = Vec::new();

    for (index, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, index, total);

        let outcome: Result<(), DataError> = match provider.fetch_daily(symbol) {
            Ok(series) => {
                series_by_symbol.insert(symbol.clone(), series);
                Ok(())
            }
            Err(err) => {
                series_by_symbol.insert(symbol.clone(), PriceSeries::empty());
                Err(err)
            }
        };

        progress.on_complete(symbol, index, total, &outcome);

        match outcome {
            Ok(()) => succeeded += 1,
            Err(err) => {
                failed += 1;
                errors.push((symbol.clone(), err));
            }
        }
    }

    progress.on_batch_complete(succeeded, failed, total);

    let summary = FetchSummary {
        total,
        succeeded,
        failed,
        errors,
    };
    (series_by_symbol, summary)
}
