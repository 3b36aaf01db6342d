//! OptFolio core — domain types, remote-service clients, and the two local
//! pipelines behind the portfolio dashboard.
//!
//! The heavy lifting (Monte Carlo simulation, weight optimization) lives
//! behind a remote HTTP service; this crate's responsibility is:
//! - Market data client (Alpha Vantage daily adjusted series)
//! - Simulation service client (four parallel per-run sequences)
//! - Aggregation: batch → means, expected profit, value trajectory,
//!   averaged weights, benchmark comparison
//! - Overlay assembly: per-symbol series → chart-ready close-price lines
//! - Explicit configuration (endpoints, credential, benchmark, universe)

pub mod aggregate;
pub mod config;
pub mod data;
pub mod domain;
pub mod overlay;
pub mod sim;

pub use aggregate::{
    benchmark_delta, compute_aggregate, compute_aggregate_with_periods,
    describe_benchmark_delta, AggregateError, AggregateResult, PERIODS_PER_YEAR,
};
pub use config::{
    AppConfig, BenchmarkConfig, ConfigError, MarketDataConfig, SimulationConfig,
    DEFAULT_CONFIG_FILE,
};
pub use data::{
    fetch_symbols, AlphaVantageProvider, DataError, FetchProgress, FetchSummary,
    MarketDataProvider, SilentProgress, Universe,
};
pub use domain::{MalformedBatch, PriceBar, PriceSeries, SimulationBatch};
pub use overlay::{build_overlay, OverlayLine, PriceOverlay};
pub use sim::{HttpSimulationService, SimError, SimulationService};
