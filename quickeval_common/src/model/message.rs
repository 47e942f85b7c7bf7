//! Messages carried from background workers to the UI thread.
//!
//! Workers never touch the table directly: they push `UiMessage`s into an
//! unbounded channel which the UI drains on a timer, in FIFO order.

use serde::{Deserialize, Serialize};

use crate::model::evaluation::Evaluation;
use crate::tickers::Symbol;
use crate::valuation::Method;

/// One table row: symbol, one cell per valuation method, price column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Symbol in the first column.
    pub symbol: Symbol,
    /// Cells indexed by `Method::index()`; `None` leaves the cell blank.
    pub cells: [Option<Evaluation>; Method::COUNT],
    /// Text of the price column.
    pub price: String,
}

impl TableRow {
    /// Row with blank method cells.
    pub fn new(symbol: Symbol, price: impl Into<String>) -> Self {
        Self {
            symbol,
            cells: Default::default(),
            price: price.into(),
        }
    }

    /// Set the cell of `method`.
    pub fn with_cell(mut self, method: Method, evaluation: Evaluation) -> Self {
        self.cells[method.index()] = Some(evaluation);
        self
    }

    /// Cell of `method`, if filled.
    pub fn cell(&self, method: Method) -> Option<&Evaluation> {
        self.cells[method.index()].as_ref()
    }
}

/// Action requested from the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// Remove every row from the table.
    Clear,
    /// Append a row to the table.
    Insert(TableRow),
    /// Show an error dialog.
    Error {
        /// Dialog title.
        title: String,
        /// Dialog body.
        message: String,
    },
}
