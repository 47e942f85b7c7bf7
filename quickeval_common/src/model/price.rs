//! Price periods and the current-price/change record shown in the last column.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::tickers::Symbol;

/// Look-back window for the price change calculation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Period {
    /// One trading day.
    #[default]
    #[strum(serialize = "1d")]
    #[value(name = "1d")]
    OneDay,
    /// Five trading days.
    #[strum(serialize = "5d")]
    #[value(name = "5d")]
    FiveDays,
    /// One month.
    #[strum(serialize = "1mo")]
    #[value(name = "1mo")]
    OneMonth,
    /// Three months.
    #[strum(serialize = "3mo")]
    #[value(name = "3mo")]
    ThreeMonths,
    /// Six months.
    #[strum(serialize = "6mo")]
    #[value(name = "6mo")]
    SixMonths,
    /// One year.
    #[strum(serialize = "1y")]
    #[value(name = "1y")]
    OneYear,
    /// Year to date.
    #[strum(serialize = "ytd")]
    #[value(name = "ytd")]
    YearToDate,
    /// Full history.
    #[strum(serialize = "max")]
    #[value(name = "max")]
    Max,
}

/// Current price and its change over a `Period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    /// Symbol the prices belong to.
    pub symbol: Symbol,
    /// Last close of the period.
    pub current: f64,
    /// First open of the period.
    pub open: f64,
}

impl PriceChange {
    /// Build from daily bars ordered oldest first.
    ///
    /// Uses the first reported open and the last reported close; returns `None`
    /// when either is missing or the open is zero.
    pub fn from_bars(symbol: Symbol, opens: &[Option<f64>], closes: &[Option<f64>]) -> Option<Self> {
        let open = opens.iter().flatten().copied().next()?;
        let current = closes.iter().rev().flatten().copied().next()?;
        if open == 0.0 {
            return None;
        }
        Some(Self {
            symbol,
            current,
            open,
        })
    }

    /// Absolute change since the period open.
    pub fn change(&self) -> f64 {
        self.current - self.open
    }

    /// Change since the period open, in percent.
    pub fn percent_change(&self) -> f64 {
        self.change() / self.open * 100.0
    }

    /// Two-line text for the price column.
    pub fn describe(&self) -> String {
        format!(
            "Current: ${:.2}\nChange: ${:.2} ({:.2}%)",
            self.current,
            self.change(),
            self.percent_change()
        )
    }
}

/// Price column text, with a placeholder when no price could be fetched.
pub fn describe_price(price: Option<&PriceChange>) -> String {
    price
        .map(PriceChange::describe)
        .unwrap_or_else(|| "Price data unavailable".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn symbol() -> Symbol {
        "AAPL".parse().unwrap()
    }

    #[test]
    fn period_round_trips_through_its_label() {
        assert_eq!(<Period as FromStr>::from_str("ytd").unwrap(), Period::YearToDate);
        assert_eq!(<Period as FromStr>::from_str("1MO").unwrap(), Period::OneMonth);
        assert_eq!(Period::SixMonths.to_string(), "6mo");
        assert_eq!(Period::default().to_string(), "1d");
    }

    #[test]
    fn change_uses_first_open_and_last_close() {
        let opens = [None, Some(100.0), Some(104.0)];
        let closes = [Some(101.0), Some(103.0), None];
        let price = PriceChange::from_bars(symbol(), &opens, &closes).unwrap();

        assert_eq!(price.open, 100.0);
        assert_eq!(price.current, 103.0);
        assert_eq!(price.describe(), "Current: $103.00\nChange: $3.00 (3.00%)");
    }

    #[test]
    fn missing_bars_render_placeholder() {
        assert!(PriceChange::from_bars(symbol(), &[], &[Some(1.0)]).is_none());
        assert!(PriceChange::from_bars(symbol(), &[Some(0.0)], &[Some(1.0)]).is_none());
        assert_eq!(describe_price(None), "Price data unavailable");
    }
}
