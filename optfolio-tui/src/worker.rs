//! Background worker thread — all network calls run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The worker
//! owns both remote clients and serves one command at a time, in order; a
//! request in flight is never interrupted.

use std::collections::BTreeMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use optfolio_core::aggregate::{compute_aggregate, AggregateResult};
use optfolio_core::config::AppConfig;
use optfolio_core::data::alpha_vantage::AlphaVantageProvider;
use optfolio_core::data::fetch::fetch_symbols;
use optfolio_core::data::provider::{DataError, FetchProgress};
use optfolio_core::domain::PriceSeries;
use optfolio_core::sim::{HttpSimulationService, SimError, SimulationService};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    FetchPrices {
        symbols: Vec<String>,
    },
    RunSimulation {
        symbols: Vec<String>,
        n_simulations: u32,
        invest_amount: f64,
        /// Echoed back for display; the optimization request does not carry it.
        risk: f64,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    // Price fetching
    FetchProgress {
        symbol: String,
        index: usize,
        total: usize,
    },
    FetchSymbolDone {
        symbol: String,
        /// `Some` on failure.
        error: Option<String>,
        /// Transport failures are worth retrying; per-symbol refusals are not.
        retryable: bool,
    },
    FetchBatchDone {
        series_by_symbol: BTreeMap<String, PriceSeries>,
        succeeded: usize,
        failed: usize,
    },

    // Simulation
    SimulationDone {
        outcome: Box<SimulationOutcome>,
    },
    SimulationFailed {
        error: String,
        retryable: bool,
    },
}

/// Everything the results panels need from one completed request.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub aggregate: AggregateResult,
    /// Mean of the per-run Sharpe ratios, shown as a preview metric.
    pub mean_sharpe: f64,
    pub invest_amount: f64,
    pub risk: f64,
    pub n_runs: usize,
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    config: AppConfig,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("optfolio-worker".into())
        .spawn(move || {
            worker_loop(rx, tx, config);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, config: AppConfig) {
    let provider = AlphaVantageProvider::new(&config.market_data);
    let service = HttpSimulationService::new(&config.simulation);

    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => handle_command(cmd, &provider, &service, &tx),
        }
    }
}

fn handle_command(
    cmd: WorkerCommand,
    provider: &AlphaVantageProvider,
    service: &HttpSimulationService,
    tx: &Sender<WorkerResponse>,
) {
    match cmd {
        WorkerCommand::FetchPrices { symbols } => {
            handle_fetch(&symbols, provider, tx);
        }
        WorkerCommand::RunSimulation {
            symbols,
            n_simulations,
            invest_amount,
            risk,
        } => {
            handle_simulation(&symbols, n_simulations, invest_amount, risk, service, tx);
        }
        WorkerCommand::Shutdown => {} // handled in loop
    }
}

fn handle_fetch(
    symbols: &[String],
    provider: &AlphaVantageProvider,
    tx: &Sender<WorkerResponse>,
) {
    let progress = ChannelProgress { tx: tx.clone() };
    let (series_by_symbol, summary) = fetch_symbols(provider, symbols, &progress);
    let _ = tx.send(WorkerResponse::FetchBatchDone {
        series_by_symbol,
        succeeded: summary.succeeded,
        failed: summary.failed,
    });
}

fn handle_simulation(
    symbols: &[String],
    n_simulations: u32,
    invest_amount: f64,
    risk: f64,
    service: &HttpSimulationService,
    tx: &Sender<WorkerResponse>,
) {
    let batch = match service.simulate(symbols, n_simulations) {
        Ok(batch) => batch,
        Err(e) => {
            let retryable = matches!(e, SimError::Transport(_));
            let _ = tx.send(WorkerResponse::SimulationFailed {
                error: e.to_string(),
                retryable,
            });
            return;
        }
    };

    match compute_aggregate(&batch, invest_amount) {
        Ok(aggregate) => {
            let mean_sharpe = batch.sharpe().iter().sum::<f64>() / batch.len() as f64;
            let _ = tx.send(WorkerResponse::SimulationDone {
                outcome: Box::new(SimulationOutcome {
                    aggregate,
                    mean_sharpe,
                    invest_amount,
                    risk,
                    n_runs: batch.len(),
                }),
            });
        }
        Err(e) => {
            let _ = tx.send(WorkerResponse::SimulationFailed {
                error: e.to_string(),
                retryable: false,
            });
        }
    }
}

/// FetchProgress implementation that sends messages through a channel.
struct ChannelProgress {
    tx: Sender<WorkerResponse>,
}

impl FetchProgress for ChannelProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::FetchProgress {
            symbol: symbol.to_string(),
            index,
            total,
        });
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        let (error, retryable) = match result {
            Ok(()) => (None, false),
            Err(e) => (Some(e.to_string()), matches!(e, DataError::Transport(_))),
        };
        let _ = self.tx.send(WorkerResponse::FetchSymbolDone {
            symbol: symbol.to_string(),
            error,
            retryable,
        });
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {
        // The worker sends FetchBatchDone itself, with the series attached.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, AppConfig::default());
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_joins_when_command_channel_drops() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, AppConfig::default());
        drop(cmd_tx);
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn channel_types_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WorkerCommand>();
        assert_send::<WorkerResponse>();
        assert_send::<SimulationOutcome>();
    }
}
