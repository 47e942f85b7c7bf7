//! Result table state owned by the UI thread.
//!
//! `ResultTable` is the only mutator of the displayed rows: it applies the
//! `UiMessage`s drained from the worker queue and hands back any error dialog
//! they carry. Cell text is wrapped when a row is inserted.

use log::debug;
use quickeval_common::display::wrap_text;
use quickeval_common::model::{TableRow, UiMessage};

/// Column width used for wrapping cell text.
pub const WRAP_WIDTH: usize = 30;

/// Modal message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

/// Rows currently displayed.
#[derive(Debug, Default)]
pub struct ResultTable {
    rows: Vec<TableRow>,
}

fn wrap_row(mut row: TableRow) -> TableRow {
    for cell in row.cells.iter_mut().flatten() {
        cell.text = wrap_text(&cell.text, WRAP_WIDTH);
    }
    row.price = wrap_text(&row.price, WRAP_WIDTH);
    row
}

impl ResultTable {
    /// Apply one queued message; error messages are returned as dialogs.
    pub fn apply(&mut self, message: UiMessage) -> Option<Dialog> {
        match message {
            UiMessage::Clear => {
                self.rows.clear();
                debug!("Table cleared");
                None
            }
            UiMessage::Insert(row) => {
                debug!("Inserted row for {}", row.symbol);
                self.rows.push(wrap_row(row));
                None
            }
            UiMessage::Error { title, message } => Some(Dialog { title, message }),
        }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}
