//! Financial snapshot of a single company.
//!
//! A `FinancialSnapshot` bundles the annual income statement, balance sheet and
//! cash-flow statement together with a handful of company-info fields. Each
//! `Statement` is a small table: period labels ordered newest first, and for
//! every line item one value per period (missing values are `None`).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::tickers::Symbol;

/// Line item labels used by the valuation methods.
pub mod line_items {
    /// Income statement: income before taxes.
    pub const PRETAX_INCOME: &str = "Pretax Income";
    /// Income statement: net income.
    pub const NET_INCOME: &str = "Net Income";
    /// Balance sheet: cash and cash equivalents.
    pub const CASH_AND_EQUIVALENTS: &str = "Cash And Cash Equivalents";
    /// Balance sheet: total debt.
    pub const TOTAL_DEBT: &str = "Total Debt";
    /// Balance sheet: debt due within a year.
    pub const CURRENT_DEBT: &str = "Current Debt";
    /// Balance sheet: long-term debt.
    pub const LONG_TERM_DEBT: &str = "Long Term Debt";
    /// Balance sheet: other short-term investments.
    pub const OTHER_SHORT_TERM_INVESTMENTS: &str = "Other Short Term Investments";
    /// Cash-flow statement: free cash flow.
    pub const FREE_CASH_FLOW: &str = "Free Cash Flow";
}

/// One financial statement: line items over reporting periods, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    periods: Vec<String>,
    items: BTreeMap<String, Vec<Option<f64>>>,
}

impl Statement {
    /// Create an empty statement over the given periods (newest first).
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            items: BTreeMap::new(),
        }
    }

    /// Build a statement from `(line item, period, value)` points.
    ///
    /// Periods are sorted newest first (labels compare as ISO dates) and every
    /// line item is aligned to the full set of periods, leaving gaps as `None`.
    pub fn from_points<I, S, P>(points: I) -> Self
    where
        I: IntoIterator<Item = (S, P, f64)>,
        S: Into<String>,
        P: Into<String>,
    {
        let points: Vec<(String, String, f64)> = points
            .into_iter()
            .map(|(item, period, value)| (item.into(), period.into(), value))
            .collect();

        let periods: Vec<String> = points
            .iter()
            .map(|(_, period, _)| period.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();

        let mut statement = Statement::new(periods);
        for (item, period, value) in points {
            if let Some(idx) = statement.periods.iter().position(|p| *p == period) {
                let width = statement.periods.len();
                let row = statement.items.entry(item).or_insert_with(|| vec![None; width]);
                row[idx] = Some(value);
            }
        }
        statement
    }

    /// Insert or replace a line item. Values are aligned with `periods()`.
    pub fn insert(&mut self, item: impl Into<String>, mut values: Vec<Option<f64>>) {
        values.resize(self.periods.len().max(values.len()), None);
        self.items.insert(item.into(), values);
    }

    /// Builder-style variant of [`Statement::insert`].
    pub fn with_item(mut self, item: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.insert(item, values);
        self
    }

    /// Period labels, newest first.
    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    /// All values of a line item, newest first.
    pub fn item(&self, name: &str) -> Option<&[Option<f64>]> {
        self.items.get(name).map(Vec::as_slice)
    }

    /// Most recent reported value of a line item.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.item(name)?.iter().flatten().copied().next()
    }

    /// True when no line items are present.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Company-level figures used by the valuation methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    /// Company display name.
    pub long_name: Option<String>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// Book value per share.
    pub book_value: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
    /// Last traded price.
    pub current_price: Option<f64>,
    /// Trailing twelve-month earnings per share.
    pub trailing_eps: Option<f64>,
    /// Return on equity as a fraction (0.25 = 25%).
    pub return_on_equity: Option<f64>,
    /// Trailing twelve-month revenue.
    pub total_revenue: Option<f64>,
}

/// Everything fetched for a symbol, memoized for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Symbol the data belongs to.
    pub symbol: Symbol,
    /// Annual income statement.
    pub income: Statement,
    /// Annual balance sheet.
    pub balance_sheet: Statement,
    /// Annual cash-flow statement.
    pub cash_flow: Statement,
    /// Company-level figures.
    pub info: CompanyInfo,
}

impl FinancialSnapshot {
    /// Snapshot with empty statements and default info.
    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            income: Statement::default(),
            balance_sheet: Statement::default(),
            cash_flow: Statement::default(),
            info: CompanyInfo::default(),
        }
    }

    /// True when the provider returned nothing usable for the symbol.
    pub fn is_empty(&self) -> bool {
        self.income.is_empty()
            && self.balance_sheet.is_empty()
            && self.cash_flow.is_empty()
            && self.info == CompanyInfo::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_points_newest_first() {
        let statement = Statement::from_points(vec![
            ("Net Income", "2021-12-31", 1.0),
            ("Net Income", "2023-12-31", 3.0),
            ("Pretax Income", "2022-12-31", 20.0),
            ("Net Income", "2022-12-31", 2.0),
        ]);

        assert_eq!(statement.periods(), ["2023-12-31", "2022-12-31", "2021-12-31"]);
        assert_eq!(
            statement.item("Net Income").unwrap(),
            [Some(3.0), Some(2.0), Some(1.0)]
        );
        assert_eq!(statement.item("Pretax Income").unwrap(), [None, Some(20.0), None]);
        assert_eq!(statement.latest("Pretax Income"), Some(20.0));
        assert_eq!(statement.latest("Total Debt"), None);
    }

    #[test]
    fn insert_pads_short_rows() {
        let statement = Statement::new(vec!["2024".into(), "2023".into()])
            .with_item("Free Cash Flow", vec![Some(5.0)]);
        assert_eq!(statement.item("Free Cash Flow").unwrap(), [Some(5.0), None]);
    }
}
