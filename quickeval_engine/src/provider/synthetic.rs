//! Offline demo data.
//!
//! `SyntheticProvider` fabricates plausible statements and prices so the app
//! can be explored without network access. Prices follow a small random walk
//! around the last value handed out for each symbol, so consecutive requests
//! for the same symbol look continuous.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Datelike, Local};
use log::info;
use quickeval_common::Result;
use quickeval_common::model::line_items;
use quickeval_common::model::{CompanyInfo, FinancialSnapshot, Period, PriceChange, Statement};
use quickeval_common::tickers::Symbol;
use rand::Rng;

use super::MarketDataProvider;

/// Number of annual periods generated per statement.
const YEARS: usize = 5;

/// Approximate trading days covered by a period.
fn trading_days(period: Period) -> usize {
    match period {
        Period::OneDay => 1,
        Period::FiveDays => 5,
        Period::OneMonth => 21,
        Period::ThreeMonths => 63,
        Period::SixMonths => 126,
        Period::OneYear => 252,
        Period::YearToDate => (Local::now().ordinal() as usize * 252 / 365).max(1),
        Period::Max => 2520,
    }
}

/// Next price of a random walk: a uniform move within ±1%, floored at one cent.
fn next_price(current_price: f64) -> f64 {
    let mut rng = rand::rng();
    let change: f64 = rng.random_range(-0.01..0.01);
    (current_price * (1.0 + change)).max(0.01)
}

/// Random-walk market data for offline use.
pub struct SyntheticProvider {
    last_prices: Mutex<HashMap<Symbol, f64>>,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticProvider {
    /// Create a provider with no price history.
    pub fn new() -> Self {
        Self {
            last_prices: Mutex::new(HashMap::new()),
        }
    }

    fn last_price(&self, symbol: &Symbol) -> Result<f64> {
        let mut prices = self.last_prices.lock()?;
        let price = *prices
            .entry(symbol.clone())
            .or_insert_with(|| rand::rng().random_range(20.0..500.0));
        Ok(price)
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn fetch_snapshot(&self, symbol: &Symbol) -> Result<FinancialSnapshot> {
        let price = self.last_price(symbol)?;
        let mut rng = rand::rng();

        let this_year = Local::now().year();
        let periods: Vec<String> = (1..=YEARS as i32)
            .map(|back| format!("{}-12-31", this_year - back))
            .collect();

        let revenue: f64 = rng.random_range(1.0e9..2.0e11);
        let margin: f64 = rng.random_range(0.02..0.35);
        let mut pretax = Vec::with_capacity(YEARS);
        let mut net = Vec::with_capacity(YEARS);
        let mut free_cash_flow = Vec::with_capacity(YEARS);
        for _ in 0..YEARS {
            let yearly = revenue * margin * rng.random_range(0.7..1.3);
            let yearly = if rng.random_bool(0.1) { -yearly * 0.3 } else { yearly };
            pretax.push(Some(yearly));
            net.push(Some(yearly * 0.79));
            free_cash_flow.push(Some(yearly * rng.random_range(0.6..1.1)));
        }

        let cash = revenue * rng.random_range(0.05..0.5);
        let long_term_debt = revenue * rng.random_range(0.0..0.6);
        let current_debt = long_term_debt * rng.random_range(0.05..0.3);
        let investments = revenue * rng.random_range(0.0..0.2);

        let income = Statement::new(periods.clone())
            .with_item(line_items::PRETAX_INCOME, pretax)
            .with_item(line_items::NET_INCOME, net.clone());
        let balance_sheet = Statement::new(periods.clone())
            .with_item(line_items::CASH_AND_EQUIVALENTS, vec![Some(cash); YEARS])
            .with_item(line_items::CURRENT_DEBT, vec![Some(current_debt); YEARS])
            .with_item(line_items::LONG_TERM_DEBT, vec![Some(long_term_debt); YEARS])
            .with_item(line_items::TOTAL_DEBT, vec![Some(current_debt + long_term_debt); YEARS])
            .with_item(line_items::OTHER_SHORT_TERM_INVESTMENTS, vec![Some(investments); YEARS]);
        let cash_flow = Statement::new(periods).with_item(line_items::FREE_CASH_FLOW, free_cash_flow);

        let shares: f64 = rng.random_range(1.0e8..1.0e10);
        let book_value = revenue * rng.random_range(0.2..1.5) / shares;
        let latest_net = net.first().copied().flatten().unwrap_or(0.0);
        let info = CompanyInfo {
            long_name: Some(format!("{} Synthetic Corp.", symbol)),
            market_cap: Some(price * shares),
            book_value: Some(book_value),
            shares_outstanding: Some(shares),
            current_price: Some(price),
            trailing_eps: Some(latest_net / shares),
            return_on_equity: Some(latest_net / (book_value * shares)),
            total_revenue: Some(revenue),
        };

        info!(
            "Generated synthetic data for {} ({})",
            symbol,
            info.long_name.as_deref().unwrap_or("unnamed")
        );
        Ok(FinancialSnapshot {
            symbol: symbol.clone(),
            income,
            balance_sheet,
            cash_flow,
            info,
        })
    }

    fn fetch_price_change(&self, symbol: &Symbol, period: Period) -> Result<Option<PriceChange>> {
        let open = self.last_price(symbol)?;
        let current = (0..trading_days(period)).fold(open, |price, _| next_price(price));
        self.last_prices.lock()?.insert(symbol.clone(), current);
        Ok(Some(PriceChange {
            symbol: symbol.clone(),
            current,
            open,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickeval_common::Method;

    #[test]
    fn random_walk_stays_within_one_percent() {
        for _ in 0..100 {
            let next = next_price(100.0);
            assert!((99.0..=101.0).contains(&next));
        }
        assert_eq!(next_price(0.0), 0.01);
    }

    #[test]
    fn snapshot_feeds_every_method() {
        let provider = SyntheticProvider::new();
        let symbol: Symbol = "DEMO".parse().unwrap();
        let snapshot = provider.fetch_snapshot(&symbol).unwrap();

        assert_eq!(snapshot.income.periods().len(), YEARS);
        assert_eq!(snapshot.info.long_name.as_deref(), Some("DEMO Synthetic Corp."));
        for method in Method::ALL {
            assert!(method.evaluate(&snapshot).is_ok(), "{} failed", method);
        }
    }

    #[test]
    fn consecutive_prices_are_continuous() {
        let provider = SyntheticProvider::new();
        let symbol: Symbol = "DEMO".parse().unwrap();
        let first = provider.fetch_price_change(&symbol, Period::FiveDays).unwrap().unwrap();
        let second = provider.fetch_price_change(&symbol, Period::OneDay).unwrap().unwrap();
        assert_eq!(second.open, first.current);
    }
}
