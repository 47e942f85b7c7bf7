//! Windowless mode: run every method once and print the table.
//!
//! Rows go to stdout, one block per symbol; error dialogs go to stderr.

use std::io::{self, Write};
use std::time::Duration;

use crossbeam_channel::Receiver;
use log::info;
use quickeval_common::model::{Period, TableRow, UiMessage};
use quickeval_common::tickers::parse_symbols;
use quickeval_common::{EvalError, Method, Result};
use quickeval_engine::Analyzer;

/// Upper bound on how long a headless run waits for the next message.
const RECV_TIMEOUT: Duration = Duration::from_secs(300);

/// Render one row as a text block.
pub fn render_row(row: &TableRow) -> String {
    let mut out = format!("== {} ==\n", row.symbol);
    for method in Method::ALL {
        let text = row.cell(method).map(|c| c.text.as_str()).unwrap_or("-");
        out.push_str(&format!("[{}]\n{}\n", method, text));
    }
    out.push_str(&format!("[Current Price]\n{}\n", row.price));
    out
}

/// Wait for the table published by a run over `expected` symbols.
pub fn collect_rows(
    ui_rx: &Receiver<UiMessage>,
    expected: usize,
    timeout: Duration,
) -> Result<(Vec<TableRow>, Vec<(String, String)>)> {
    let mut rows = Vec::with_capacity(expected);
    let mut errors = Vec::new();
    while rows.len() < expected {
        match ui_rx
            .recv_timeout(timeout)
            .map_err(|e| EvalError::ChannelRecv(e.to_string()))?
        {
            UiMessage::Clear => rows.clear(),
            UiMessage::Insert(row) => rows.push(row),
            UiMessage::Error { title, message } => errors.push((title, message)),
        }
    }
    Ok((rows, errors))
}

/// Evaluate all methods for `input` and print the results.
pub fn run(analyzer: &Analyzer, ui_rx: &Receiver<UiMessage>, input: &str, period: Period) -> Result<()> {
    let symbols = parse_symbols(input)?;
    if symbols.is_empty() {
        eprintln!("No ticker symbols given; use --tickers or --path");
        return Ok(());
    }

    let expected = symbols.len();
    info!("Headless run for {} symbol(s)", expected);
    analyzer.run_all(symbols, period)?;
    let (rows, errors) = collect_rows(ui_rx, expected, RECV_TIMEOUT)?;

    for (title, message) in errors {
        eprintln!("{}: {}", title, message);
    }
    let mut stdout = io::stdout().lock();
    for row in &rows {
        writeln!(stdout, "{}", render_row(row))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use quickeval_common::model::{Evaluation, Verdict};

    fn row(symbol: &str) -> TableRow {
        TableRow::new(symbol.parse().unwrap(), "Price data unavailable")
            .with_cell(Method::Buffett, Evaluation::new("Adjusted Value:\n1.00", Verdict::Positive))
    }

    #[test]
    fn renders_every_column() {
        let text = render_row(&row("AAPL"));
        assert!(text.starts_with("== AAPL ==\n[Buffett]\nAdjusted Value:\n1.00\n"));
        assert!(text.contains("[Hempton Nutty]\n-\n"));
        assert!(text.ends_with("[Current Price]\nPrice data unavailable\n"));
    }

    #[test]
    fn collects_rows_after_the_last_clear() {
        let (tx, rx) = unbounded();
        tx.send(UiMessage::Error {
            title: "Data Fetch Error".into(),
            message: "boom".into(),
        })
        .unwrap();
        tx.send(UiMessage::Clear).unwrap();
        tx.send(UiMessage::Insert(row("AAPL"))).unwrap();
        tx.send(UiMessage::Insert(row("MSFT"))).unwrap();

        let (rows, errors) = collect_rows(&rx, 2, Duration::from_secs(1)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn disconnected_queue_is_an_error() {
        let (tx, rx) = unbounded::<UiMessage>();
        drop(tx);
        let err = collect_rows(&rx, 1, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, EvalError::ChannelRecv(_)));
    }
}
