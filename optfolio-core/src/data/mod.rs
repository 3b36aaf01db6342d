//! Market data: the provider seam, the Alpha Vantage client, sequential
//! multi-symbol fetching, and the stock universe.

pub mod alpha_vantage;
pub mod fetch;
pub mod provider;
pub mod universe;

pub use alpha_vantage::AlphaVantageProvider;
pub use fetch::{fetch_symbols, FetchSummary};
pub use provider::{DataError, FetchProgress, MarketDataProvider, SilentProgress};
pub use universe::Universe;
