//! Error types shared between the engine and the desktop app.
//!
//! The `EvalError` enum unifies the failure cases of fetching market data,
//! evaluating valuation formulas, and passing results between threads, so every
//! crate in the workspace can propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the engine and the app.
#[derive(Error, Debug)]
pub enum EvalError {
    /// I/O error originating from the standard library (log file, ticker file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport or HTTP status failure while talking to the market-data provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Failure while decoding a provider response with serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The provider answered, but without usable data for the symbol.
    #[error("No data available for {0}")]
    NoData(String),

    /// A financial-statement line item required by a formula is absent.
    #[error("Missing line item '{item}' in {statement}")]
    MissingLineItem {
        /// Statement name (income statement, balance sheet, cash flow).
        statement: &'static str,
        /// Line item label, e.g. `Pretax Income`.
        item: &'static str,
    },

    /// A company-info field required by a formula is absent.
    #[error("Missing info field '{0}'")]
    MissingField(&'static str),

    /// A formula divided by a zero denominator.
    #[error("Division by zero computing {0}")]
    DivisionByZero(&'static str),

    /// Not enough history in a series to compute a statistic.
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// User input contained non-alphanumeric symbols.
    #[error("Invalid symbols: {}", .0.join(", "))]
    InvalidSymbols(Vec<String>),

    /// Crossbeam channel send failed (receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam channel receive failed (all senders dropped); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// The desktop window could not be created or crashed.
    #[error("User interface error: {0}")]
    Ui(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for EvalError {
    fn from(err: PoisonError<T>) -> Self {
        EvalError::MutexLock(err.to_string())
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for EvalError {
    fn from(err: crossbeam_channel::SendError<T>) -> Self {
        EvalError::ChannelSend(err.to_string())
    }
}
