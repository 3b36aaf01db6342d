//! The selectable stock universe.
//!
//! Both dashboard panels select over the same listing, each with its own
//! selection set. The built-in listing can be replaced by a TOML file named
//! in the app config.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// An ordered listing of selectable tickers.
///
/// Order is display order; the panels render rows in listing order and
/// requests preserve it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Universe {
    /// Display name for the listing.
    pub name: String,

    /// Tickers in display order.
    pub tickers: Vec<String>,
}

impl Universe {
    /// The built-in ten-ticker listing.
    pub fn default_listing() -> Self {
        Self {
            name: "US Mixed Sectors".to_string(),
            tickers: ["AAPL", "XOM", "MSFT", "NEE", "AMT", "CAT", "PG", "JNJ", "MCD", "GS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Loads a listing from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read universe file {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parses a listing from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse universe TOML: {e}"))
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t == ticker)
    }
}
