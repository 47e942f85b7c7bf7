//! Market-data providers.
//!
//! The valuation methods only need a `FinancialSnapshot` per symbol and a price
//! change over a period; where those come from is hidden behind
//! `MarketDataProvider`:
//! - `yahoo`: Yahoo Finance HTTP endpoints (blocking `reqwest`).
//! - `synthetic`: random-walk demo data for offline use.

use quickeval_common::Result;
use quickeval_common::model::{FinancialSnapshot, Period, PriceChange};
use quickeval_common::tickers::Symbol;

pub mod synthetic;
pub mod yahoo;

/// Source of financial statements and prices.
///
/// Implementations are called from worker threads and must be thread-safe.
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name for log messages.
    fn name(&self) -> &'static str;

    /// Fetch statements and company info for `symbol`.
    fn fetch_snapshot(&self, symbol: &Symbol) -> Result<FinancialSnapshot>;

    /// Fetch the price change of `symbol` over `period`.
    ///
    /// `Ok(None)` means the provider has no price history for the period.
    fn fetch_price_change(&self, symbol: &Symbol, period: Period) -> Result<Option<PriceChange>>;
}
