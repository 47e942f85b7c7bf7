//! Dispatches valuation runs onto the worker pool.
//!
//! Every run is a single pool job. The job evaluates the requested method(s)
//! for every symbol, fetches the price column, and then publishes the table:
//! one `UiMessage::Clear` followed by one `UiMessage::Insert` per symbol, in
//! input order. Failures stay local to their symbol and method: they become
//! error-tagged cells, a log entry and, for failed fetches, one error dialog.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use log::{error, info, warn};
use quickeval_common::model::price::describe_price;
use quickeval_common::model::{Evaluation, FinancialSnapshot, Period, TableRow, UiMessage};
use quickeval_common::tickers::Symbol;
use quickeval_common::{EvalError, Method, Result};

use crate::cache::SnapshotCache;
use crate::config::EngineConfig;
use crate::pool::WorkerPool;
use crate::provider::MarketDataProvider;

/// Outcome of one method for one symbol; `Err` only when fetching failed.
type CellResult = std::result::Result<Evaluation, EvalError>;

fn fetch_failed(symbol: &Symbol) -> Evaluation {
    Evaluation::error(format!("Error fetching data for {}", symbol))
}

/// State shared by all jobs.
struct Shared {
    provider: Arc<dyn MarketDataProvider>,
    cache: SnapshotCache,
    ui_tx: Sender<UiMessage>,
}

impl Shared {
    fn snapshot(&self, symbol: &Symbol) -> Result<Arc<FinancialSnapshot>> {
        self.cache
            .get_or_fetch(symbol, || self.provider.fetch_snapshot(symbol))
    }

    fn evaluate(&self, symbol: &Symbol, method: Method) -> CellResult {
        let snapshot = self.snapshot(symbol)?;
        Ok(method.assess(&snapshot))
    }

    /// Turn a cell result into a displayable evaluation, reporting fetch failures.
    fn resolve(&self, symbol: &Symbol, result: CellResult) -> Result<Evaluation> {
        match result {
            Ok(evaluation) => Ok(evaluation),
            Err(e) => {
                self.report_fetch_error(symbol, &e)?;
                Ok(fetch_failed(symbol))
            }
        }
    }

    fn report_fetch_error(&self, symbol: &Symbol, err: &EvalError) -> Result<()> {
        error!("Error fetching data for {}: {}", symbol, err);
        self.ui_tx.send(UiMessage::Error {
            title: "Data Fetch Error".to_string(),
            message: format!(
                "An error occurred while fetching data for {}: {}",
                symbol, err
            ),
        })?;
        Ok(())
    }

    fn price_cell(&self, symbol: &Symbol, period: Period) -> String {
        match self.provider.fetch_price_change(symbol, period) {
            Ok(price) => describe_price(price.as_ref()),
            Err(e) => {
                error!("Error fetching stock price for {}: {}", symbol, e);
                describe_price(None)
            }
        }
    }

    fn publish(&self, rows: Vec<TableRow>) -> Result<()> {
        self.ui_tx.send(UiMessage::Clear)?;
        for row in rows {
            self.ui_tx.send(UiMessage::Insert(row))?;
        }
        Ok(())
    }

    fn run_method(&self, symbols: &[Symbol], method: Method, period: Period) -> Result<()> {
        let mut rows = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let result = self.evaluate(symbol, method);
            let evaluation = self.resolve(symbol, result)?;
            let row = TableRow::new(symbol.clone(), self.price_cell(symbol, period))
                .with_cell(method, evaluation);
            rows.push(row);
        }
        self.publish(rows)
    }

    fn run_all(&self, symbols: &[Symbol], period: Period) -> Result<()> {
        // Fetch each symbol once; the method threads only read the snapshots.
        let mut snapshots = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.snapshot(symbol) {
                Ok(snapshot) => snapshots.push(Some(snapshot)),
                Err(e) => {
                    self.report_fetch_error(symbol, &e)?;
                    snapshots.push(None);
                }
            }
        }

        let snapshots = &snapshots;
        let columns: Vec<Vec<Evaluation>> = thread::scope(|scope| {
            let handles: Vec<_> = Method::ALL
                .iter()
                .map(|&method| {
                    scope.spawn(move || {
                        symbols
                            .iter()
                            .zip(snapshots)
                            .map(|(symbol, snapshot)| match snapshot {
                                Some(snapshot) => method.assess(snapshot),
                                None => fetch_failed(symbol),
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(Method::ALL)
                .map(|(handle, method)| {
                    handle.join().unwrap_or_else(|_| {
                        error!("{} evaluation thread panicked", method);
                        symbols
                            .iter()
                            .map(|s| Evaluation::error(format!("Error evaluating {} for {}", method, s)))
                            .collect()
                    })
                })
                .collect()
        });

        let mut columns: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
        let mut rows = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let mut row = TableRow::new(symbol.clone(), self.price_cell(symbol, period));
            for (method, column) in Method::ALL.into_iter().zip(columns.iter_mut()) {
                let evaluation = column.next().unwrap_or_else(|| fetch_failed(symbol));
                row = row.with_cell(method, evaluation);
            }
            rows.push(row);
        }
        self.publish(rows)
    }
}

/// Runs valuation methods in the background and streams rows to the UI.
pub struct Analyzer {
    shared: Arc<Shared>,
    pool: WorkerPool,
}

impl Analyzer {
    /// Build an analyzer whose results are sent to `ui_tx`.
    pub fn new(
        config: &EngineConfig,
        provider: Arc<dyn MarketDataProvider>,
        ui_tx: Sender<UiMessage>,
    ) -> Result<Self> {
        info!(
            "Starting analyzer: provider={}, workers={}, cache capacity={}",
            provider.name(),
            config.workers,
            config.cache_capacity
        );
        Ok(Self {
            shared: Arc::new(Shared {
                provider,
                cache: SnapshotCache::new(config.cache_capacity),
                ui_tx,
            }),
            pool: WorkerPool::new(config.workers)?,
        })
    }

    /// Evaluate one method for `symbols` and publish a table with that column filled.
    pub fn run_method(&self, symbols: Vec<Symbol>, method: Method, period: Period) -> Result<()> {
        info!("Running {} for {} symbol(s)", method, symbols.len());
        let shared = Arc::clone(&self.shared);
        self.pool.execute(move || {
            if let Err(e) = shared.run_method(&symbols, method, period) {
                warn!("{} run abandoned: {}", method, e);
            }
        })
    }

    /// Evaluate every method for `symbols` and publish a fully filled table.
    pub fn run_all(&self, symbols: Vec<Symbol>, period: Period) -> Result<()> {
        info!("Running all methods for {} symbol(s)", symbols.len());
        let shared = Arc::clone(&self.shared);
        self.pool.execute(move || {
            if let Err(e) = shared.run_all(&symbols, period) {
                warn!("Run all abandoned: {}", e);
            }
        })
    }

    /// Number of cached snapshots.
    pub fn cached_symbols(&self) -> Result<usize> {
        self.shared.cache.len()
    }
}
