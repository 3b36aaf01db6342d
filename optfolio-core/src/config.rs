//! Application configuration: remote endpoints, credentials, and the
//! benchmark used for return comparisons.
//!
//! Values resolve in three layers. Compiled-in defaults come first, an
//! optional `optfolio.toml` in the working directory overrides them, and
//! environment variables override both. Credentials are never compiled in;
//! the Alpha Vantage key arrives via the config file or
//! `ALPHAVANTAGE_API_KEY`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file consulted when present in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "optfolio.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Market data endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Query endpoint of the Alpha Vantage style service.
    pub base_url: String,

    /// API key; `None` until supplied by file or environment.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.alphavantage.co/query".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Portfolio simulation endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Optimization endpoint of the simulation service.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/optimize".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Benchmark that simulated returns are compared against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Display label, e.g. "S&P 500".
    pub label: String,

    /// Annual return of the benchmark, in percent.
    pub annual_return_pct: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            label: "S&P 500".to_string(),
            annual_return_pct: 20.34,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Market data service settings.
    pub market_data: MarketDataConfig,

    /// Simulation service settings.
    pub simulation: SimulationConfig,

    /// Benchmark comparison settings.
    pub benchmark: BenchmarkConfig,

    /// Optional path to a TOML file replacing the built-in stock universe.
    pub universe_path: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from `optfolio.toml` (if present) and applies
    /// environment overrides on top.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Same as [`AppConfig::load`] but with an explicit file path. A missing
    /// file is not an error; the defaults are used.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Parses configuration from a TOML file. All keys are optional.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("ALPHAVANTAGE_API_KEY").ok(),
            std::env::var("OPTFOLIO_DATA_URL").ok(),
            std::env::var("OPTFOLIO_SIM_URL").ok(),
        );
    }

    /// Environment wins over file values; `None` leaves the current value.
    fn apply_overrides(
        &mut self,
        api_key: Option<String>,
        data_url: Option<String>,
        sim_url: Option<String>,
    ) {
        if let Some(key) = api_key {
            self.market_data.api_key = Some(key);
        }
        if let Some(url) = data_url {
            self.market_data.base_url = url;
        }
        if let Some(url) = sim_url {
            self.simulation.base_url = url;
        }
    }
}
