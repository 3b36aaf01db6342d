//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::{HashSet, VecDeque};
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;

use optfolio_core::config::BenchmarkConfig;
use optfolio_core::data::universe::Universe;
use optfolio_core::overlay::PriceOverlay;

use crate::worker::{SimulationOutcome, WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Portfolio,
    Prices,
    Results,
    Projection,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Portfolio => 0,
            Panel::Prices => 1,
            Panel::Results => 2,
            Panel::Projection => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Portfolio),
            1 => Some(Panel::Prices),
            2 => Some(Panel::Results),
            3 => Some(Panel::Projection),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Portfolio => "Portfolio",
            Panel::Prices => "Prices",
            Panel::Results => "Results",
            Panel::Projection => "Projection",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 5).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 4) % 5).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Simulation,
    #[allow(dead_code)]
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Simulation => "SIM",
            ErrorCategory::Other => "ERR",
        }
    }
}

// ─── Portfolio form bounds ───────────────────────────────────────────

pub const INVEST_MIN: f64 = 100.0;
pub const INVEST_MAX: f64 = 1_000_000.0;
pub const INVEST_STEP: f64 = 100.0;

pub const RISK_MIN: f64 = 0.01;
pub const RISK_MAX: f64 = 0.15;
pub const RISK_STEP: f64 = 0.01;

pub const SIMS_MIN: u32 = 100;
pub const SIMS_MAX: u32 = 10_000;
pub const SIMS_STEP: u32 = 100;

/// Numeric field rows above the ticker list.
pub const FIELD_ROWS: usize = 3;

/// A row of the portfolio form: three bounded fields, then the ticker list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRow {
    InvestAmount,
    RiskTolerance,
    SimulationCount,
    Ticker(String),
}

/// Portfolio panel state — the request form.
#[derive(Debug)]
pub struct PortfolioPanelState {
    pub invest_amount: f64,
    pub risk: f64,
    pub n_simulations: u32,
    pub selected: HashSet<String>,
    pub cursor: usize,
    pub sim_in_progress: bool,
}

impl PortfolioPanelState {
    pub fn new() -> Self {
        Self {
            invest_amount: 1_000.0,
            risk: 0.01,
            n_simulations: 1_000,
            selected: HashSet::new(),
            cursor: 0,
            sim_in_progress: false,
        }
    }

    pub fn row_count(&self, universe: &Universe) -> usize {
        FIELD_ROWS + universe.len()
    }

    /// Resolve the cursor to a form row.
    pub fn cursor_row(&self, universe: &Universe) -> Option<FormRow> {
        match self.cursor {
            0 => Some(FormRow::InvestAmount),
            1 => Some(FormRow::RiskTolerance),
            2 => Some(FormRow::SimulationCount),
            i => universe
                .tickers()
                .get(i - FIELD_ROWS)
                .cloned()
                .map(FormRow::Ticker),
        }
    }

    /// Step the numeric field under the cursor, clamped to its bounds.
    pub fn adjust_field(&mut self, universe: &Universe, direction: i32) {
        let d = direction as f64;
        match self.cursor_row(universe) {
            Some(FormRow::InvestAmount) => {
                self.invest_amount =
                    (self.invest_amount + INVEST_STEP * d).clamp(INVEST_MIN, INVEST_MAX);
            }
            Some(FormRow::RiskTolerance) => {
                self.risk = (self.risk + RISK_STEP * d).clamp(RISK_MIN, RISK_MAX);
            }
            Some(FormRow::SimulationCount) => {
                let next = i64::from(self.n_simulations) + i64::from(SIMS_STEP) * i64::from(direction);
                self.n_simulations = next.clamp(i64::from(SIMS_MIN), i64::from(SIMS_MAX)) as u32;
            }
            _ => {}
        }
    }

    /// Toggle the ticker under the cursor, if the cursor is on one.
    pub fn toggle_cursor_ticker(&mut self, universe: &Universe) {
        if let Some(FormRow::Ticker(ticker)) = self.cursor_row(universe) {
            if !self.selected.remove(&ticker) {
                self.selected.insert(ticker);
            }
        }
    }

    /// Select every ticker in the listing.
    pub fn select_all(&mut self, universe: &Universe) {
        for ticker in universe.tickers() {
            self.selected.insert(ticker.clone());
        }
    }

    /// Selected tickers in listing order, as sent to the services.
    pub fn selected_in_order(&self, universe: &Universe) -> Vec<String> {
        universe
            .tickers()
            .iter()
            .filter(|t| self.selected.contains(*t))
            .cloned()
            .collect()
    }
}

/// Prices panel state — its own selection plus the fetched overlay.
#[derive(Debug)]
pub struct PricesPanelState {
    pub selected: HashSet<String>,
    pub cursor: usize,
    pub fetch_in_progress: bool,
    pub fetch_current_symbol: Option<String>,
    pub fetch_done: usize,
    pub fetch_total: usize,
    /// Per-symbol failures from the latest pass, in request order.
    pub last_failures: Vec<(String, String)>,
    pub overlay: Option<PriceOverlay>,
}

impl PricesPanelState {
    /// Starts with AAPL selected, when the listing carries it.
    pub fn new(universe: &Universe) -> Self {
        let mut selected = HashSet::new();
        if universe.contains("AAPL") {
            selected.insert("AAPL".to_string());
        }
        Self {
            selected,
            cursor: 0,
            fetch_in_progress: false,
            fetch_current_symbol: None,
            fetch_done: 0,
            fetch_total: 0,
            last_failures: Vec::new(),
            overlay: None,
        }
    }

    pub fn toggle_cursor_ticker(&mut self, universe: &Universe) {
        if let Some(ticker) = universe.tickers().get(self.cursor).cloned() {
            if !self.selected.remove(&ticker) {
                self.selected.insert(ticker);
            }
        }
    }

    pub fn select_all(&mut self, universe: &Universe) {
        for ticker in universe.tickers() {
            self.selected.insert(ticker.clone());
        }
    }

    pub fn selected_in_order(&self, universe: &Universe) -> Vec<String> {
        universe
            .tickers()
            .iter()
            .filter(|t| self.selected.contains(*t))
            .cloned()
            .collect()
    }
}

/// Results panel state.
#[derive(Debug)]
pub struct ResultsPanelState {
    pub outcome: Option<SimulationOutcome>,
}

impl ResultsPanelState {
    pub fn new() -> Self {
        Self { outcome: None }
    }
}

/// Projection panel state.
#[derive(Debug)]
pub struct ProjectionPanelState {
    pub trajectory: Option<Vec<f64>>,
    pub label: String,
}

impl ProjectionPanelState {
    pub fn new() -> Self {
        Self {
            trajectory: None,
            label: String::new(),
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Shared listing both selection panels draw from
    pub universe: Universe,
    pub benchmark: BenchmarkConfig,

    // Panel states
    pub portfolio: PortfolioPanelState,
    pub prices: PricesPanelState,
    pub results: ResultsPanelState,
    pub projection: ProjectionPanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        universe: Universe,
        benchmark: BenchmarkConfig,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        let prices = PricesPanelState::new(&universe);
        Self {
            active_panel: Panel::Portfolio,
            running: true,
            universe,
            benchmark,
            portfolio: PortfolioPanelState::new(),
            prices,
            results: ResultsPanelState::new(),
            projection: ProjectionPanelState::new(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::Welcome,
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
