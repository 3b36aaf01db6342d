//! Panel 5 — Help: keyboard shortcuts and a short tour of the dashboard.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "About");
    lines.push(Line::from(Span::styled(
        "  OptFolio sends your investment parameters to a remote optimization",
        theme::muted(),
    )));
    lines.push(Line::from(Span::styled(
        "  service, aggregates the returned Monte Carlo simulations, and charts",
        theme::muted(),
    )));
    lines.push(Line::from(Span::styled(
        "  the statistics next to daily closes fetched per symbol.",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Portfolio");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "h / l", "Adjust the field under the cursor");
    key(&mut lines, "Space", "Toggle stock selection");
    key(&mut lines, "a", "Select all stocks");
    key(&mut lines, "d", "Deselect all stocks");
    key(&mut lines, "Enter", "Run the optimization");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Prices");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Space", "Toggle symbol selection");
    key(&mut lines, "a", "Select all symbols");
    key(&mut lines, "d", "Deselect all symbols");
    key(&mut lines, "f", "Fetch daily closes for selected symbols");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 3 — Results");
    key(&mut lines, "", "Mean return, Sharpe, expected profit, averaged weights");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Projection");
    key(&mut lines, "", "Compounded portfolio value across simulation runs");
    lines.push(Line::from(""));

    section(&mut lines, "Error Categories");
    key(&mut lines, "NET", "A service could not be reached; retry later");
    key(&mut lines, "DATA", "A symbol produced no usable daily series");
    key(&mut lines, "SIM", "The simulation response was empty or malformed");
    key(&mut lines, "ERR", "Anything else");

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
