//! OptFolio TUI — five-panel terminal dashboard for portfolio optimization.
//!
//! Panels:
//! 1. Portfolio — investment parameters, stock selection, request trigger
//! 2. Prices — daily closes fetched per symbol, shared overlay chart
//! 3. Results — aggregate statistics and averaged allocation weights
//! 4. Projection — compounded portfolio value across simulation runs
//! 5. Help — keyboard shortcuts and documentation

mod app;
mod input;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use optfolio_core::config::AppConfig;
use optfolio_core::data::universe::Universe;
use optfolio_core::overlay::build_overlay;

use crate::app::{AppState, ErrorCategory};
use crate::worker::{WorkerCommand, WorkerResponse};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Configuration: defaults, then optfolio.toml, then environment.
    let config = AppConfig::load()?;
    let universe = match &config.universe_path {
        Some(path) => Universe::from_file(path).map_err(anyhow::Error::msg)?,
        None => Universe::default_listing(),
    };

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();

    // Spawn the worker; it owns both remote clients.
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, config.clone());

    // Build app state
    let mut app = AppState::new(universe, config.benchmark.clone(), cmd_tx.clone(), resp_rx);
    if config.market_data.api_key.is_none() {
        app.set_warning("ALPHAVANTAGE_API_KEY is not set; price fetches will fail");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::FetchProgress {
            symbol,
            index,
            total,
        } => {
            app.prices.fetch_current_symbol = Some(symbol);
            app.prices.fetch_done = index;
            app.prices.fetch_total = total;
        }
        WorkerResponse::FetchSymbolDone {
            symbol,
            error,
            retryable,
        } => {
            app.prices.fetch_done += 1;
            if let Some(err) = error {
                let category = if retryable {
                    ErrorCategory::Network
                } else {
                    ErrorCategory::Data
                };
                app.prices.last_failures.push((symbol.clone(), err.clone()));
                app.push_error(category, err, symbol);
            }
        }
        WorkerResponse::FetchBatchDone {
            series_by_symbol,
            succeeded,
            failed,
        } => {
            app.prices.fetch_in_progress = false;
            app.prices.fetch_current_symbol = None;
            app.prices.overlay = Some(build_overlay(&series_by_symbol));
            if failed == 0 {
                app.set_status(format!("Fetch complete: {succeeded} symbols plotted"));
            } else {
                app.set_warning(format!("Fetch done: {succeeded} ok, {failed} failed"));
            }
        }
        WorkerResponse::SimulationDone { outcome } => {
            app.portfolio.sim_in_progress = false;
            app.projection.trajectory =
                Some(outcome.aggregate.cumulative_value_trajectory.clone());
            app.projection.label = format!(
                "{} runs | mean return {:.2}%",
                outcome.n_runs,
                outcome.aggregate.mean_return * 100.0
            );
            app.set_status(format!(
                "Simulation complete: {} runs, expected profit ${:.2}",
                outcome.n_runs, outcome.aggregate.expected_profit
            ));
            app.results.outcome = Some(*outcome);
        }
        WorkerResponse::SimulationFailed { error, retryable } => {
            app.portfolio.sim_in_progress = false;
            let category = if retryable {
                ErrorCategory::Network
            } else {
                ErrorCategory::Simulation
            };
            app.push_error(category, error, "simulation request".into());
        }
    }
}
