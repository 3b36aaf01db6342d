//! HTTP client for the portfolio simulation service.
//!
//! The service exposes one GET endpoint. `stocks` carries the symbol list
//! JSON-encoded inside the query string, `n_simulations` the run count. The
//! body is a bare four-element JSON array:
//!
//! ```text
//! [returns, volatility, sharpe, weights]
//! ```
//!
//! with one entry per run in each element. Equal lengths are the service's
//! contract; a ragged body is rejected before it reaches aggregation.

use std::collections::BTreeMap;
use std::time::Duration;

use super::service::{SimError, SimulationService};
use crate::config::SimulationConfig;
use crate::domain::{MalformedBatch, SimulationBatch};

/// Wire shape of a simulation response.
type RawSimulation = (
    Vec<f64>,
    Vec<f64>,
    Vec<f64>,
    Vec<BTreeMap<String, f64>>,
);

/// Blocking client for the simulation endpoint.
pub struct HttpSimulationService {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSimulationService {
    pub fn new(config: &SimulationConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("optfolio/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// JSON-encodes the symbol list for the `stocks` query parameter.
    fn encode_stocks(symbols: &[String]) -> String {
        serde_json::to_string(symbols).expect("symbol list serialization failed")
    }

    /// Validates a decoded response against the equal-length contract.
    fn validate(raw: RawSimulation) -> Result<SimulationBatch, SimError> {
        let (returns, volatility, sharpe, weights) = raw;
        Ok(SimulationBatch::try_new(
            returns, volatility, sharpe, weights,
        )?)
    }
}

impl SimulationService for HttpSimulationService {
    fn name(&self) -> &str {
        "http_simulation"
    }

    fn simulate(
        &self,
        symbols: &[String],
        n_simulations: u32,
    ) -> Result<SimulationBatch, SimError> {
        let stocks = Self::encode_stocks(symbols);
        let n = n_simulations.to_string();

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("stocks", stocks.as_str()), ("n_simulations", n.as_str())])
            .send()
            .map_err(|e| SimError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SimError::Transport(format!(
                "HTTP {status} from simulation service"
            )));
        }

        let raw: RawSimulation = resp.json().map_err(|e| {
            SimError::Malformed(MalformedBatch(format!(
                "undecodable simulation payload: {e}"
            )))
        })?;

        Self::validate(raw)
    }
}
