//! Keyboard input dispatch — overlays first, then global keys, then panel handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Overlay, Panel};
use crate::worker::WorkerCommand;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Portfolio; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Prices; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Results; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Projection; return; }
        KeyCode::Char('5') => { app.active_panel = Panel::Help; return; }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Portfolio => handle_portfolio_key(app, key),
        Panel::Prices => handle_prices_key(app, key),
        Panel::Results | Panel::Projection | Panel::Help => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_portfolio_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app.portfolio.row_count(&app.universe);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row_count > 0 && app.portfolio.cursor + 1 < row_count {
                app.portfolio.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.portfolio.cursor = app.portfolio.cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.portfolio.adjust_field(&app.universe, -1);
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.portfolio.adjust_field(&app.universe, 1);
        }
        KeyCode::Char(' ') => {
            app.portfolio.toggle_cursor_ticker(&app.universe);
        }
        KeyCode::Char('a') => {
            app.portfolio.select_all(&app.universe);
        }
        KeyCode::Char('d') => {
            app.portfolio.selected.clear();
        }
        KeyCode::Enter => {
            if app.portfolio.sim_in_progress {
                app.set_warning("Simulation already running");
                return;
            }
            let symbols = app.portfolio.selected_in_order(&app.universe);
            if symbols.is_empty() {
                app.set_warning("Select at least one stock first");
                return;
            }
            app.portfolio.sim_in_progress = true;
            // A new request discards the previous results outright.
            app.results.outcome = None;
            app.projection.trajectory = None;
            app.projection.label.clear();
            let _ = app.worker_tx.send(WorkerCommand::RunSimulation {
                symbols,
                n_simulations: app.portfolio.n_simulations,
                invest_amount: app.portfolio.invest_amount,
                risk: app.portfolio.risk,
            });
            app.set_status("Requesting optimized portfolios...");
        }
        _ => {}
    }
}

fn handle_prices_key(app: &mut AppState, key: KeyEvent) {
    let row_count = app.universe.len();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if row_count > 0 && app.prices.cursor + 1 < row_count {
                app.prices.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.prices.cursor = app.prices.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            app.prices.toggle_cursor_ticker(&app.universe);
        }
        KeyCode::Char('a') => {
            app.prices.select_all(&app.universe);
        }
        KeyCode::Char('d') => {
            app.prices.selected.clear();
        }
        KeyCode::Char('f') => {
            if app.prices.fetch_in_progress {
                app.set_warning("Fetch already running");
                return;
            }
            let symbols = app.prices.selected_in_order(&app.universe);
            if symbols.is_empty() {
                app.set_warning("Select at least one symbol to plot");
                return;
            }
            app.prices.fetch_in_progress = true;
            app.prices.fetch_done = 0;
            app.prices.fetch_total = symbols.len();
            app.prices.fetch_current_symbol = None;
            app.prices.last_failures.clear();
            app.prices.overlay = None;
            let _ = app.worker_tx.send(WorkerCommand::FetchPrices { symbols });
            app.set_status("Fetching daily series...");
        }
        _ => {}
    }
}
