//! Service seam for portfolio simulation.

use thiserror::Error;

use crate::domain::{MalformedBatch, SimulationBatch};

/// Errors surfaced while running a simulation request.
#[derive(Debug, Error)]
pub enum SimError {
    /// The request never produced a usable HTTP response. Retryable: the
    /// service may simply be down or unreachable.
    #[error("simulation service unreachable: {0}")]
    Transport(String),

    /// The service answered but the body was not a valid batch.
    #[error(transparent)]
    Malformed(#[from] MalformedBatch),
}

/// A source of portfolio simulation batches.
///
/// One call covers one optimization request: the service runs
/// `n_simulations` independent runs over the given symbols and reports all
/// of them in a single batch.
pub trait SimulationService: Send + Sync {
    /// Human-readable name of this service.
    fn name(&self) -> &str;

    /// Runs the simulation and returns the validated batch.
    fn simulate(&self, symbols: &[String], n_simulations: u32)
        -> Result<SimulationBatch, SimError>;
}
