//! Domain types shared by both pipelines.

pub mod bar;
pub mod batch;

pub use bar::{PriceBar, PriceSeries};
pub use batch::{MalformedBatch, SimulationBatch};
