//! Panel 3 — Results: aggregate statistics and averaged allocation weights.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use optfolio_core::aggregate::{benchmark_delta, describe_benchmark_delta};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(outcome) = &app.results.outcome else {
        render_empty(f, area);
        return;
    };

    let agg = &outcome.aggregate;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Runs: ", theme::muted()),
        Span::styled(format!("{}", outcome.n_runs), theme::accent()),
        Span::styled("  Invested: ", theme::muted()),
        Span::styled(format!("${:.0}", outcome.invest_amount), theme::accent()),
        Span::styled("  Risk: ", theme::muted()),
        Span::styled(format!("{:.2}", outcome.risk), theme::accent()),
    ]));
    lines.push(Line::from(""));

    let mean_return_pct = agg.mean_return * 100.0;
    metric(
        &mut lines,
        "Mean annual return",
        format!("{mean_return_pct:.2}%"),
        theme::metric_color(agg.mean_return),
    );
    metric(
        &mut lines,
        "Mean volatility",
        format!("{:.4}", agg.mean_volatility),
        theme::neutral(),
    );
    metric(
        &mut lines,
        "Mean Sharpe",
        format!("{:.2}", outcome.mean_sharpe),
        theme::sharpe_style(outcome.mean_sharpe),
    );
    metric(
        &mut lines,
        "Expected profit",
        format!("${:.2}", agg.expected_profit),
        theme::metric_color(agg.expected_profit),
    );
    lines.push(Line::from(""));

    // Benchmark comparison sentence
    let delta = benchmark_delta(mean_return_pct, app.benchmark.annual_return_pct);
    let sentence = describe_benchmark_delta(
        mean_return_pct,
        app.benchmark.annual_return_pct,
        &app.benchmark.label,
    );
    lines.push(Line::from(vec![
        Span::styled("The simulated return is ", theme::muted()),
        Span::styled(sentence, theme::metric_color(delta)),
    ]));
    lines.push(Line::from(""));

    // Averaged weights, one bar per ticker in listing-independent sorted order
    lines.push(Line::from(Span::styled(
        "Averaged weights",
        theme::accent_bold(),
    )));
    let max_weight = agg.averaged_weights.values().copied().fold(0.0_f64, f64::max);
    for (ticker, weight) in &agg.averaged_weights {
        lines.push(Line::from(vec![
            Span::styled(format!("  {ticker:>6} "), theme::muted()),
            Span::styled(weight_bar(*weight, max_weight, 24), theme::accent()),
            Span::styled(format!(" {:>5.1}%", weight * 100.0), theme::muted()),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No results yet. Configure the Portfolio panel (press 1) and press Enter.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn metric<'a>(lines: &mut Vec<Line<'a>>, label: &str, value: String, style: Style) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:>20}: "), theme::muted()),
        Span::styled(value, style),
    ]));
}

fn weight_bar(weight: f64, max_weight: f64, width: usize) -> String {
    if max_weight <= 0.0 {
        return format!("[{}]", " ".repeat(width));
    }
    let frac = (weight / max_weight).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
