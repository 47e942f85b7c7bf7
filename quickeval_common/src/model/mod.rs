//! Domain models shared by the engine and the app.
//!
//! - `snapshot`: per-symbol financial statements and company info.
//! - `price`: price periods and the current-price/change record.
//! - `evaluation`: verdicts and evaluation results of valuation methods.
//! - `message`: table rows and the messages sent from workers to the UI.

pub mod evaluation;
pub mod message;
pub mod price;
pub mod snapshot;

pub use evaluation::{Evaluation, Verdict};
pub use message::{TableRow, UiMessage};
pub use price::{Period, PriceChange};
pub use snapshot::{CompanyInfo, FinancialSnapshot, Statement, line_items};
