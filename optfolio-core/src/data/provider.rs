//! Market data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over the daily-series source so the
//! dashboard can swap implementations and mock for tests.

use thiserror::Error;

use crate::domain::PriceSeries;

/// Structured error types for market data operations.
///
/// These are designed to be displayable in the dashboard status bar and
/// error history.
#[derive(Debug, Error)]
pub enum DataError {
    /// The request never produced a usable HTTP response (connect failure,
    /// timeout, non-2xx status). Nothing upstream refused the symbol itself.
    #[error("network failure: {0}")]
    Transport(String),

    /// The provider answered but carried no daily series for this symbol
    /// (unknown ticker, throttling, bad credential). Scoped to one symbol;
    /// other symbols in the same pass proceed normally.
    #[error("no daily series for '{symbol}': {reason}")]
    SeriesUnavailable { symbol: String, reason: String },

    /// The response body could not be decoded into daily bars.
    #[error("unreadable response for '{symbol}': {detail}")]
    BadPayload { symbol: String, detail: String },
}

/// Trait for market data providers.
///
/// Implementations handle the specifics of one upstream API. There is no
/// cache or retry layer above this trait: every call goes to the wire, and
/// a failed call stays failed until the user triggers another pass.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the compact daily adjusted series for one symbol,
    /// ascending by date.
    fn fetch_daily(&self, symbol: &str) -> Result<PriceSeries, DataError>;
}

/// Progress callback for multi-symbol fetch passes.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire pass is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress sink that reports nothing. Printing would corrupt a terminal UI,
/// so callers without a progress channel use this.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: &Result<(), DataError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
