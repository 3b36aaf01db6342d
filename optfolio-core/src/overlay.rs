//! Close-price overlay assembly for the prices chart.
//!
//! Takes the per-symbol series map produced by a fetch pass and reshapes it
//! into labeled plot lines on a shared date axis. Symbols whose fetch failed
//! hold the empty-series sentinel and are skipped here without comment —
//! the fetch step already reported them. No resampling, interpolation, or
//! forward-fill happens: sparser symbols simply have fewer points.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::PriceSeries;

/// One plot line: a symbol and its (date, close) points ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub symbol: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Chart-ready overlay of close-price lines on a shared date axis.
///
/// Bounds cover every point of every line so a renderer can scale its axes
/// without re-scanning. They are `None` exactly when `lines` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceOverlay {
    /// Lines in symbol order, one per non-empty input series.
    pub lines: Vec<OverlayLine>,

    /// (earliest, latest) date across all lines.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,

    /// (lowest, highest) close across all lines.
    pub close_bounds: Option<(f64, f64)>,
}

impl PriceOverlay {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Builds the overlay from a fetch pass's output map.
///
/// Pure and deterministic: the same input map always yields the same
/// overlay, with lines in the map's symbol order.
pub fn build_overlay(series_by_symbol: &BTreeMap<String, PriceSeries>) -> PriceOverlay {
    let mut lines = Vec::new();
    let mut date_bounds: Option<(NaiveDate, NaiveDate)> = None;
    let mut close_bounds: Option<(f64, f64)> = None;

    for (symbol, series) in series_by_symbol {
        if series.is_empty() {
            continue;
        }

        // Bars are ascending within a series, so its ends give its date span.
        if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
            date_bounds = Some(match date_bounds {
                Some((min, max)) => (min.min(first), max.max(last)),
                None => (first, last),
            });
        }

        let points: Vec<(NaiveDate, f64)> = series.closes().collect();
        for &(_, close) in &points {
            close_bounds = Some(match close_bounds {
                Some((min, max)) => (min.min(close), max.max(close)),
                None => (close, close),
            });
        }

        lines.push(OverlayLine {
            symbol: symbol.clone(),
            points,
        });
    }

    PriceOverlay {
        lines,
        date_bounds,
        close_bounds,
    }
}
