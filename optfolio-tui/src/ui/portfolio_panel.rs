//! Panel 1 — Portfolio: request form with bounded fields and stock selection.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{
    AppState, FIELD_ROWS, INVEST_MAX, INVEST_MIN, RISK_MAX, RISK_MIN, SIMS_MAX, SIMS_MIN,
};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let p = &app.portfolio;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]move [h/l]adjust [Space]toggle [a]ll [d]eselect [Enter]optimize",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    if p.sim_in_progress {
        lines.push(Line::from(vec![
            Span::styled("Optimizing ", theme::warning()),
            Span::styled(format!("{} runs...", p.n_simulations), theme::accent()),
        ]));
        lines.push(Line::from(""));
    }

    field_row(
        &mut lines,
        "Invest amount",
        render_slider_inline(p.invest_amount, INVEST_MIN, INVEST_MAX, 20),
        format!("${:.0}", p.invest_amount),
        p.cursor == 0,
    );
    field_row(
        &mut lines,
        "Risk tolerance",
        render_slider_inline(p.risk, RISK_MIN, RISK_MAX, 20),
        format!("{:.2}", p.risk),
        p.cursor == 1,
    );
    field_row(
        &mut lines,
        "Simulations",
        render_slider_inline(
            f64::from(p.n_simulations),
            f64::from(SIMS_MIN),
            f64::from(SIMS_MAX),
            20,
        ),
        format!("{}", p.n_simulations),
        p.cursor == 2,
    );

    lines.push(Line::from(""));

    // Stock selection
    lines.push(Line::from(vec![
        Span::styled("Stocks: ", theme::muted()),
        Span::styled(
            format!("{}/{}", p.selected.len(), app.universe.len()),
            theme::accent(),
        ),
    ]));

    for (i, ticker) in app.universe.tickers().iter().enumerate() {
        let is_cursor = FIELD_ROWS + i == p.cursor;
        let is_selected = p.selected.contains(ticker);

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

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn field_row<'a>(
    lines: &mut Vec<Line<'a>>,
    label: &str,
    bar: String,
    value: String,
    is_cursor: bool,
) {
    let label_style = if is_cursor {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else {
        theme::muted()
    };
    let bar_style = if is_cursor { theme::accent() } else { theme::muted() };

    lines.push(Line::from(vec![
        Span::styled(format!("{label:>15}: "), label_style),
        Span::styled(bar, bar_style),
        Span::styled(format!(" {value}"), label_style),
    ]));
}

fn render_slider_inline(value: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 {
        return format!("[{}]", "=".repeat(width));
    }
    let frac = ((value - min) / range).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
