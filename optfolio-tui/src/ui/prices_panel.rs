//! Panel 2 — Prices: symbol selection and the close-price overlay chart.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};

use optfolio_core::overlay::PriceOverlay;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)])
        .split(area);

    render_selection(f, chunks[0], app);
    render_overlay(f, chunks[1], app);
}

fn render_selection(f: &mut Frame, area: Rect, app: &AppState) {
    let prices = &app.prices;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Symbols: ", theme::muted()),
        Span::styled(
            format!("{}/{}", prices.selected.len(), app.universe.len()),
            theme::accent(),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        "[Space]toggle [a]ll [d]esel [f]etch",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    if prices.fetch_in_progress {
        let sym = prices.fetch_current_symbol.as_deref().unwrap_or("...");
        lines.push(Line::from(vec![
            Span::styled("Fetching ", theme::warning()),
            Span::styled(sym, theme::accent()),
            Span::styled(
                format!("... [{}/{}]", prices.fetch_done, prices.fetch_total),
                theme::muted(),
            ),
        ]));
        lines.push(Line::from(""));
    }

    for (i, ticker) in app.universe.tickers().iter().enumerate() {
        let is_cursor = i == prices.cursor;
        let is_selected = prices.selected.contains(ticker);

        let check = if is_selected { "[x]" } else { "[ ]" };
        let ticker_style = if is_cursor {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else if is_selected {
            theme::accent()
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(check),
            Span::raw(" "),
            Span::styled(ticker.as_str(), ticker_style),
        ]));
    }

    if !prices.last_failures.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Failed:", theme::negative())));
        for (symbol, error) in &prices.last_failures {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(symbol.as_str(), theme::negative()),
                Span::styled(format!(" {}", truncate(error, 16)), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_overlay(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.prices.overlay {
        Some(overlay) if !overlay.is_empty() => render_chart(f, area, overlay),
        Some(_) => render_hint(f, area, "Every selected symbol failed; nothing to plot."),
        None => render_hint(
            f,
            area,
            "Select symbols on the left and press f to plot their daily closes.",
        ),
    }
}

fn render_hint(f: &mut Frame, area: Rect, hint: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, overlay: &PriceOverlay) {
    let (Some((min_date, max_date)), Some((min_close, max_close))) =
        (overlay.date_bounds, overlay.close_bounds)
    else {
        return;
    };

    // Dates map to day offsets from the earliest bar across all lines.
    let series_points: Vec<(String, Vec<(f64, f64)>)> = overlay
        .lines
        .iter()
        .map(|line| {
            let points = line
                .points
                .iter()
                .map(|&(date, close)| ((date - min_date).num_days() as f64, close))
                .collect();
            (line.symbol.clone(), points)
        })
        .collect();

    let datasets: Vec<Dataset> = series_points
        .iter()
        .enumerate()
        .map(|(i, (symbol, points))| {
            Dataset::default()
                .name(symbol.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(i)))
                .graph_type(GraphType::Line)
                .data(points)
        })
        .collect();

    let x_max = (max_date - min_date).num_days() as f64;
    let padding = (max_close - min_close).abs() * 0.05;
    let y_min = min_close - padding;
    let y_max = max_close + padding;

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(min_date.format("%Y-%m-%d").to_string(), theme::muted()),
                    Span::styled(max_date.format("%Y-%m-%d").to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close ($)", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

// Cuts on char boundaries: failure messages embed symbols from a
// user-editable listing, which need not be ASCII.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}.")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_messages_whole() {
        assert_eq!(truncate("network failure: timeout", 40), "network failure: timeout");
    }

    #[test]
    fn truncate_cuts_on_char_boundaries() {
        // Æ straddles the byte at max - 1; a byte slice would panic here.
        let msg = "no series for ÆON: throttled by upstream";
        assert_eq!(truncate(msg, 16), "no series for Æ.");
        assert_eq!(truncate(msg, 16).chars().count(), 16);
    }
}
