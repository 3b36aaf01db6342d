//! Neon theme tokens for the OptFolio TUI.
//!
//! Style helpers shared across the panels:
//! - **Accent**: Electric cyan (focus, highlights)
//! - **Positive**: Neon green (gains, successful fetches)
//! - **Negative**: Hot pink (losses, failures)
//! - **Warning**: Neon orange (alerts, in-progress work)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (chrome, disabled, secondary text)

use ratatui::style::{Color, Modifier, Style};

/// Electric cyan accent used directly by charts.
pub const ACCENT: Color = Color::Rgb(0, 255, 255);

const POSITIVE: Color = Color::Rgb(0, 255, 128);
const NEGATIVE: Color = Color::Rgb(255, 20, 147);
const WARNING: Color = Color::Rgb(255, 140, 0);
const NEUTRAL: Color = Color::Rgb(147, 112, 219);
const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

/// Border style for a panel block.
pub fn panel_border(active: bool) -> Style {
    if active { accent() } else { muted() }
}

/// Title style for a panel block.
pub fn panel_title(active: bool) -> Style {
    if active { accent_bold() } else { muted() }
}

/// Style for a signed metric: gains green, losses pink.
pub fn metric_color(value: f64) -> Style {
    if value >= 0.0 { positive() } else { negative() }
}

/// Gradient for Sharpe ratios, from muted up to positive.
pub fn sharpe_style(sharpe: f64) -> Style {
    let color = match sharpe {
        s if s >= 2.0 => POSITIVE,
        s if s >= 1.0 => ACCENT,
        s if s >= 0.5 => NEUTRAL,
        s if s >= 0.0 => MUTED,
        _ => NEGATIVE,
    };
    Style::default().fg(color)
}

/// Stable per-series color for the price overlay chart.
pub fn series_color(index: usize) -> Color {
    const SERIES: [Color; 6] = [ACCENT, POSITIVE, WARNING, NEUTRAL, NEGATIVE, MUTED];
    SERIES[index % SERIES.len()]
}
