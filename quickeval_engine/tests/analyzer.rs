use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use quickeval_common::model::line_items;
use quickeval_common::model::{
    CompanyInfo, FinancialSnapshot, Period, PriceChange, Statement, UiMessage, Verdict,
};
use quickeval_common::tickers::{Symbol, parse_symbols};
use quickeval_common::{EvalError, Method, Result};
use quickeval_engine::{Analyzer, EngineConfig, MarketDataProvider};

/// In-memory provider serving fixed snapshots and counting fetches.
struct StaticProvider {
    snapshots: HashMap<Symbol, FinancialSnapshot>,
    fetches: AtomicUsize,
    latency: Duration,
}

impl MarketDataProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_snapshot(&self, symbol: &Symbol) -> Result<FinancialSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.latency);
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| EvalError::NoData(symbol.to_string()))
    }

    fn fetch_price_change(&self, symbol: &Symbol, _period: Period) -> Result<Option<PriceChange>> {
        if self.snapshots.contains_key(symbol) {
            Ok(Some(PriceChange {
                symbol: symbol.clone(),
                current: 110.0,
                open: 100.0,
            }))
        } else {
            Err(EvalError::Network("unknown symbol".into()))
        }
    }
}

fn fixture() -> FinancialSnapshot {
    let periods = vec!["2024-12-31".to_string(), "2023-12-31".to_string()];
    FinancialSnapshot {
        symbol: "AAPL".parse().unwrap(),
        income: Statement::new(periods.clone())
            .with_item(line_items::PRETAX_INCOME, vec![Some(100.0), Some(80.0)])
            .with_item(line_items::NET_INCOME, vec![Some(70.0), Some(60.0)]),
        balance_sheet: Statement::new(periods.clone())
            .with_item(line_items::CASH_AND_EQUIVALENTS, vec![Some(50.0), Some(40.0)])
            .with_item(line_items::TOTAL_DEBT, vec![Some(30.0), Some(30.0)]),
        cash_flow: Statement::new(periods)
            .with_item(line_items::FREE_CASH_FLOW, vec![Some(60.0), Some(60.0)]),
        info: CompanyInfo {
            market_cap: Some(500.0),
            book_value: Some(10.0),
            shares_outstanding: Some(10.0),
            current_price: Some(50.0),
            trailing_eps: Some(7.0),
            return_on_equity: Some(0.7),
            total_revenue: Some(100.0),
            ..CompanyInfo::default()
        },
    }
}

fn setup() -> (Analyzer, Arc<StaticProvider>, Receiver<UiMessage>) {
    setup_with_latency(Duration::ZERO)
}

fn setup_with_latency(latency: Duration) -> (Analyzer, Arc<StaticProvider>, Receiver<UiMessage>) {
    let snapshot = fixture();
    let provider = Arc::new(StaticProvider {
        snapshots: HashMap::from([(snapshot.symbol.clone(), snapshot)]),
        fetches: AtomicUsize::new(0),
        latency,
    });
    let (tx, rx) = unbounded();
    let config = EngineConfig {
        workers: 2,
        ..EngineConfig::default()
    };
    let analyzer = Analyzer::new(&config, provider.clone(), tx).unwrap();
    (analyzer, provider, rx)
}

/// Collect messages until `rows` inserts have arrived.
fn collect(rx: &Receiver<UiMessage>, rows: usize) -> Vec<UiMessage> {
    let mut messages = Vec::new();
    let mut inserted = 0;
    while inserted < rows {
        let message = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("analyzer did not publish in time");
        if matches!(message, UiMessage::Insert(_)) {
            inserted += 1;
        }
        messages.push(message);
    }
    messages
}

#[test]
fn single_method_fills_its_column_and_reports_fetch_errors() {
    let (analyzer, _provider, rx) = setup();
    let symbols = parse_symbols("aapl, nope").unwrap();

    analyzer
        .run_method(symbols, Method::Buffett, Period::OneDay)
        .unwrap();
    let messages = collect(&rx, 2);

    assert_eq!(messages.len(), 4);
    match &messages[0] {
        UiMessage::Error { title, message } => {
            assert_eq!(title, "Data Fetch Error");
            assert!(message.contains("NOPE"));
        }
        other => panic!("expected error dialog, got {:?}", other),
    }
    assert_eq!(messages[1], UiMessage::Clear);

    let UiMessage::Insert(aapl) = &messages[2] else {
        panic!("expected AAPL row");
    };
    assert_eq!(aapl.symbol.as_str(), "AAPL");
    let buffett = aapl.cell(Method::Buffett).unwrap();
    assert_eq!(buffett.verdict, Verdict::Positive);
    assert_eq!(buffett.text, "Adjusted Value:\n920.00\n\nMarket Cap:\n500.00");
    assert!(aapl.cell(Method::Brandes).is_none());
    assert_eq!(aapl.price, "Current: $110.00\nChange: $10.00 (10.00%)");

    let UiMessage::Insert(nope) = &messages[3] else {
        panic!("expected NOPE row");
    };
    let failed = nope.cell(Method::Buffett).unwrap();
    assert_eq!(failed.verdict, Verdict::Negative);
    assert_eq!(failed.text, "Error fetching data for NOPE");
    assert_eq!(nope.price, "Price data unavailable");
}

#[test]
fn run_all_fills_every_column_and_reports_each_failure_once() {
    let (analyzer, _provider, rx) = setup();
    let symbols = parse_symbols("NOPE,AAPL").unwrap();

    analyzer.run_all(symbols, Period::FiveDays).unwrap();
    let messages = collect(&rx, 2);

    let dialogs = messages
        .iter()
        .filter(|m| matches!(m, UiMessage::Error { .. }))
        .count();
    assert_eq!(dialogs, 1);

    let rows: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            UiMessage::Insert(row) => Some(row),
            _ => None,
        })
        .collect();
    assert_eq!(rows[0].symbol.as_str(), "NOPE");
    assert_eq!(rows[1].symbol.as_str(), "AAPL");

    for method in Method::ALL {
        assert!(rows[0].cell(method).is_some());
        assert!(rows[1].cell(method).is_some());
    }
    assert_eq!(
        rows[1].cell(Method::Hartz).unwrap().text,
        "Expected Returns: 14.00%"
    );
    assert_eq!(
        rows[1].cell(Method::Pabrai).unwrap().verdict,
        Verdict::Negative
    );
    assert_eq!(
        rows[1].cell(Method::Hempton).unwrap().verdict,
        Verdict::Positive
    );
}

#[test]
fn snapshots_are_fetched_once_per_symbol_across_runs() {
    let (analyzer, provider, rx) = setup();
    let symbols = parse_symbols("AAPL").unwrap();

    analyzer
        .run_method(symbols.clone(), Method::Hempton, Period::OneDay)
        .unwrap();
    collect(&rx, 1);
    analyzer
        .run_method(symbols, Method::Pabrai, Period::OneDay)
        .unwrap();
    collect(&rx, 1);

    assert_eq!(provider.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(analyzer.cached_symbols().unwrap(), 1);
}

#[test]
fn run_all_fetches_each_cold_symbol_once() {
    let (analyzer, provider, rx) = setup_with_latency(Duration::from_millis(100));
    let symbols = parse_symbols("AAPL, NOPE").unwrap();

    analyzer.run_all(symbols, Period::OneDay).unwrap();
    let messages = collect(&rx, 2);

    assert_eq!(provider.fetches.load(Ordering::SeqCst), 2);
    assert_eq!(analyzer.cached_symbols().unwrap(), 1);
    let dialogs = messages
        .iter()
        .filter(|m| matches!(m, UiMessage::Error { .. }))
        .count();
    assert_eq!(dialogs, 1);
}
