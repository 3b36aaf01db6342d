//! Portfolio simulation: the service seam and the HTTP client.

pub mod http;
pub mod service;

pub use http::HttpSimulationService;
pub use service::{SimError, SimulationService};
