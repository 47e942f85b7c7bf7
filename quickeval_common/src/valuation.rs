//! The five valuation methods.
//!
//! Each method is a pure function from a `FinancialSnapshot` to an
//! `Evaluation`: it reads a few statement line items and info fields, applies
//! a fixed formula, and classifies the outcome with a threshold comparison.
//! Missing inputs and zero denominators surface as `EvalError`s;
//! [`Method::assess`] turns those into error-tagged cells.

use clap::ValueEnum;
use log::error;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::display::format_thousands;
use crate::error::EvalError;
use crate::model::evaluation::{Evaluation, Verdict};
use crate::model::snapshot::{FinancialSnapshot, Statement, line_items};
use crate::result::Result;

/// Number of most recent annual periods considered for income averages.
pub const HISTORY_YEARS: usize = 5;
/// Multiple applied to average pre-tax income by the Buffett method.
pub const EARNINGS_MULTIPLE: f64 = 10.0;
/// Reference bond yield for the Brandes earnings-yield test.
pub const BOND_YIELD: f64 = 0.09;
/// Minimum expected return for the Hartz, Millsap, Hill method.
pub const MIN_EXPECTED_RETURN: f64 = 0.07;
/// Years of free-cash-flow growth projected by the Pabrai method.
pub const PROJECTION_YEARS: i32 = 10;
/// Revenue multiple used by the Hempton nutty test.
pub const REVENUE_MULTIPLE: f64 = 10.0;
/// Highest acceptable market-cap to multiplied-revenue ratio.
pub const MAX_REVENUE_RATIO: f64 = 10.0;

const INCOME_STATEMENT: &str = "income statement";
const BALANCE_SHEET: &str = "balance sheet";
const CASH_FLOW: &str = "cash flow";

/// Named valuation heuristic.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Method {
    /// Ten times average pre-tax income plus net cash against market cap.
    Buffett,
    /// Four value checks: no losses, low debt, price below book, high earnings yield.
    Brandes,
    /// Return on equity divided by price-to-book.
    #[strum(serialize = "Hartz, Millsap, Hill")]
    #[value(name = "hartz")]
    Hartz,
    /// Projected free cash flow plus liquid assets against market cap.
    Pabrai,
    /// Market cap against ten times revenue.
    #[strum(serialize = "Hempton Nutty")]
    #[value(name = "hempton")]
    Hempton,
}

impl Method {
    /// Number of methods, i.e. method columns in the table.
    pub const COUNT: usize = 5;

    /// All methods in column order.
    pub const ALL: [Method; Method::COUNT] = [
        Method::Buffett,
        Method::Brandes,
        Method::Hartz,
        Method::Pabrai,
        Method::Hempton,
    ];

    /// Zero-based column offset among the method columns.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label of the button that runs this method alone.
    pub fn button_label(self) -> String {
        format!("{} Method", self)
    }

    /// Hover text of the method's button.
    pub fn tooltip(self) -> &'static str {
        match self {
            Method::Buffett => "Calculate stock value using the Buffett method",
            Method::Brandes => "Evaluate stock using the Brandes method",
            Method::Hartz => "Calculate stock value using the Hartz, Millsap, Hill method",
            Method::Pabrai => "Calculate intrinsic stock value using the Pabrai method",
            Method::Hempton => "Evaluate stock using the Hempton Nutty method",
        }
    }

    /// What the method was doing, for error messages.
    fn activity(self) -> &'static str {
        match self {
            Method::Buffett => "calculating value",
            Method::Brandes => "evaluating stock",
            Method::Hartz => "calculating Hartz, Millsap, Hill",
            Method::Pabrai => "calculating intrinsic value",
            Method::Hempton => "calculating Hempton Nutty",
        }
    }

    /// Run the method's formula.
    pub fn evaluate(self, snapshot: &FinancialSnapshot) -> Result<Evaluation> {
        match self {
            Method::Buffett => buffett(snapshot),
            Method::Brandes => brandes(snapshot),
            Method::Hartz => hartz_millsap_hill(snapshot),
            Method::Pabrai => pabrai(snapshot),
            Method::Hempton => hempton_nutty(snapshot),
        }
    }

    /// Run the method, converting any failure into a logged, error-tagged cell.
    pub fn assess(self, snapshot: &FinancialSnapshot) -> Evaluation {
        match self.evaluate(snapshot) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                let text = format!("Error {} for {}: {}", self.activity(), snapshot.symbol, e);
                error!("{}", text);
                Evaluation::error(text)
            }
        }
    }
}

fn require_item<'a>(
    statement: &'a Statement,
    kind: &'static str,
    item: &'static str,
) -> Result<&'a [Option<f64>]> {
    statement.item(item).ok_or(EvalError::MissingLineItem {
        statement: kind,
        item,
    })
}

fn require_latest(statement: &Statement, kind: &'static str, item: &'static str) -> Result<f64> {
    statement.latest(item).ok_or(EvalError::MissingLineItem {
        statement: kind,
        item,
    })
}

fn require_field(value: Option<f64>, name: &'static str) -> Result<f64> {
    value.ok_or(EvalError::MissingField(name))
}

fn divide(numerator: f64, denominator: f64, what: &'static str) -> Result<f64> {
    if denominator == 0.0 {
        Err(EvalError::DivisionByZero(what))
    } else {
        Ok(numerator / denominator)
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Ten times the average recent pre-tax income, plus cash, minus debt.
///
/// Positive when the adjusted value exceeds the market cap.
pub fn buffett(snapshot: &FinancialSnapshot) -> Result<Evaluation> {
    let pretax = require_item(&snapshot.income, INCOME_STATEMENT, line_items::PRETAX_INCOME)?;
    let average = mean(pretax.iter().take(HISTORY_YEARS).flatten().copied()).ok_or_else(|| {
        EvalError::InsufficientHistory(format!("no {} values", line_items::PRETAX_INCOME))
    })?;
    let cash = require_latest(&snapshot.balance_sheet, BALANCE_SHEET, line_items::CASH_AND_EQUIVALENTS)?;
    let debt = require_latest(&snapshot.balance_sheet, BALANCE_SHEET, line_items::TOTAL_DEBT)?;
    let market_cap = require_field(snapshot.info.market_cap, "marketCap")?;

    let adjusted_value = average * EARNINGS_MULTIPLE + cash - debt;
    let verdict = if adjusted_value > market_cap {
        Verdict::Positive
    } else {
        Verdict::Negative
    };
    let text = format!(
        "Adjusted Value:\n{}\n\nMarket Cap:\n{}",
        format_thousands(adjusted_value),
        format_thousands(market_cap)
    );
    Ok(Evaluation::new(text, verdict))
}

/// Brandes value screen.
///
/// Positive only when all four checks pass: no losses in recent years, debt
/// below equity, price below book value, earnings yield above twice the bond
/// yield.
pub fn brandes(snapshot: &FinancialSnapshot) -> Result<Evaluation> {
    let net_income = require_item(&snapshot.income, INCOME_STATEMENT, line_items::NET_INCOME)?;
    let no_losses = net_income
        .iter()
        .take(HISTORY_YEARS)
        .all(|v| matches!(v, Some(x) if *x > 0.0));

    let balance = &snapshot.balance_sheet;
    let short_term_debt = balance.latest(line_items::CURRENT_DEBT).unwrap_or(0.0);
    let long_term_debt = balance.latest(line_items::LONG_TERM_DEBT).unwrap_or(0.0);
    let total_debt = short_term_debt + long_term_debt;

    let info = &snapshot.info;
    let book_value_per_share = require_field(info.book_value, "bookValue")?;
    let shares = require_field(info.shares_outstanding, "sharesOutstanding")?;
    let debt_to_equity = divide(total_debt, book_value_per_share * shares, "debt to equity")?;

    let current_price = require_field(info.current_price, "currentPrice")?;
    let price_to_book = divide(current_price, book_value_per_share, "price to book")?;

    let eps = require_field(info.trailing_eps, "trailingEps")?;
    let earnings_yield = divide(eps, current_price, "earnings yield")?;
    let meets_bond_yield = earnings_yield > 2.0 * BOND_YIELD;

    let low_debt = debt_to_equity < 1.0;
    let below_book = price_to_book < 1.0;
    let text = format!(
        "No Losses: {}\nDebt < 100% Equity: {}\nPrice < Book Value: {}\nEarnings Yield > 2x Bond Yield: {}",
        yes_no(no_losses),
        yes_no(low_debt),
        yes_no(below_book),
        yes_no(meets_bond_yield)
    );
    let verdict = if no_losses && low_debt && below_book && meets_bond_yield {
        Verdict::Positive
    } else {
        Verdict::Negative
    };
    Ok(Evaluation::new(text, verdict))
}

/// Expected return as return on equity over price-to-book.
///
/// Absent fields count as zero and a zero price-to-book gives a zero return.
pub fn hartz_millsap_hill(snapshot: &FinancialSnapshot) -> Result<Evaluation> {
    let info = &snapshot.info;
    let roe = info.return_on_equity.unwrap_or(0.0);
    let book_value_per_share = info.book_value.unwrap_or(0.0);
    let price_to_book = if book_value_per_share != 0.0 {
        info.current_price.unwrap_or(0.0) / book_value_per_share
    } else {
        0.0
    };
    let expected_returns = if price_to_book != 0.0 {
        roe / price_to_book
    } else {
        0.0
    };

    let verdict = if expected_returns >= MIN_EXPECTED_RETURN {
        Verdict::Positive
    } else {
        Verdict::Negative
    };
    let text = format!("Expected Returns: {:.2}%", expected_returns * 100.0);
    Ok(Evaluation::new(text, verdict))
}

/// Mean of successive fractional changes, in series order.
///
/// Pairs with a missing value or a non-finite change are skipped.
fn mean_pct_change(series: &[Option<f64>]) -> Option<f64> {
    mean(series.windows(2).filter_map(|pair| match pair {
        [Some(prev), Some(next)] => Some(next / prev - 1.0).filter(|c| c.is_finite()),
        _ => None,
    }))
}

/// Intrinsic value from projected free cash flow plus liquid assets.
///
/// The growth rate is the mean period-over-period change of the free cash
/// flow series as stored (newest first); it compounds the last entry of the
/// series over `PROJECTION_YEARS`.
pub fn pabrai(snapshot: &FinancialSnapshot) -> Result<Evaluation> {
    let free_cash_flow = require_item(&snapshot.cash_flow, CASH_FLOW, line_items::FREE_CASH_FLOW)?;
    let growth = mean_pct_change(free_cash_flow).ok_or_else(|| {
        EvalError::InsufficientHistory(format!("{} needs two consecutive values", line_items::FREE_CASH_FLOW))
    })?;
    let base = free_cash_flow.last().copied().flatten().ok_or_else(|| {
        EvalError::InsufficientHistory(format!("last {} value missing", line_items::FREE_CASH_FLOW))
    })?;
    let future_fcf = base * (1.0 + growth).powi(PROJECTION_YEARS);

    let balance = &snapshot.balance_sheet;
    let cash = balance.latest(line_items::CASH_AND_EQUIVALENTS).unwrap_or(0.0);
    let investments = balance.latest(line_items::OTHER_SHORT_TERM_INVESTMENTS).unwrap_or(0.0);
    let intrinsic_value = future_fcf + cash + investments;
    let market_cap = require_field(snapshot.info.market_cap, "marketCap")?;

    let (verdict, comparison) = if intrinsic_value > market_cap {
        (Verdict::Positive, "Undervalued")
    } else if intrinsic_value < market_cap {
        (Verdict::Negative, "Overvalued")
    } else {
        (Verdict::Neutral, "Fairly Valued")
    };
    let text = format!(
        "Intrinsic Value: {}\nMarket Cap: {}\nComparison: {}",
        format_thousands(intrinsic_value),
        format_thousands(market_cap),
        comparison
    );
    Ok(Evaluation::new(text, verdict))
}

/// Market cap relative to ten times revenue; above 10 is a bad look.
pub fn hempton_nutty(snapshot: &FinancialSnapshot) -> Result<Evaluation> {
    let market_cap = snapshot.info.market_cap.unwrap_or(0.0);
    let revenue = snapshot.info.total_revenue.unwrap_or(0.0) * REVENUE_MULTIPLE;
    let ratio = if revenue != 0.0 { market_cap / revenue } else { 0.0 };

    let (verdict, evaluation) = if ratio > MAX_REVENUE_RATIO {
        (Verdict::Negative, "Bad Look (>10)")
    } else {
        (Verdict::Positive, "Acceptable (<=10)")
    };
    let text = format!(
        "Market Cap to 10x Revenue Ratio: {:.2}\nEvaluation: {}",
        ratio, evaluation
    );
    Ok(Evaluation::new(text, verdict))
}
