//! Ticker symbols and helpers shared between the engine and the app.
//!
//! Symbols are free-form: any non-empty alphanumeric code is accepted and
//! normalized to upper case. A short list of well-known symbols backs the
//! entry-field suggestions.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Maximum number of suggestions offered for a partial symbol.
pub const MAX_SUGGESTIONS: usize = 10;

/// Symbols offered as suggestions while typing.
pub const KNOWN_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "TSLA", "AMZN", "NVDA", "META", "JPM", "JNJ", "V", "PG", "UNH",
    "HD", "DIS", "PYPL", "NFLX", "ADBE", "CRM", "INTC", "CSCO", "PFE", "ABT", "ABBV", "LLY",
    "PEP", "COST", "TXN", "AVGO", "QCOM", "NKE", "ORCL", "AMGN", "SBUX", "INTU", "CAT", "GS",
    "AXP", "MS", "BLK", "GE", "MMM", "MO", "LMT", "MCD", "KO", "WMT", "XOM", "CVX",
];

/// Validated, upper-cased ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        if !normalized.is_empty() && normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Symbol(normalized))
        } else {
            Err(EvalError::InvalidSymbols(vec![normalized]))
        }
    }
}

/// Parse a comma-separated list of symbols as typed by the user.
///
/// Blank entries are skipped. When any entry is not alphanumeric the whole
/// input is rejected with `EvalError::InvalidSymbols` listing every offender.
/// An empty input yields an empty list.
pub fn parse_symbols(input: &str) -> Result<Vec<Symbol>, EvalError> {
    parse_tokens(input.split(','))
}

fn parse_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<Symbol>, EvalError> {
    let mut symbols = Vec::new();
    let mut invalid = Vec::new();

    for token in tokens.map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<Symbol>() {
            Ok(symbol) => symbols.push(symbol),
            Err(_) => invalid.push(token.to_uppercase()),
        }
    }

    if invalid.is_empty() {
        Ok(symbols)
    } else {
        error!("Invalid ticker symbols entered: {}", invalid.join(", "));
        Err(EvalError::InvalidSymbols(invalid))
    }
}

/// Trait providing file parsing for symbols.
pub trait SymbolParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines. Returns an
    /// error if the reader fails or any symbol is invalid.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Symbol>, EvalError>;
}

impl SymbolParser for Symbol {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, EvalError> {
        let mut symbols = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            let tokens = line.split(|c: char| c == ',' || c.is_whitespace());
            symbols.extend(parse_tokens(tokens)?);
        }
        Ok(symbols)
    }
}

/// Known symbols starting with the last, partially typed entry of `input`.
///
/// Symbols already present earlier in the input are not suggested again.
pub fn suggestions(input: &str) -> Vec<&'static str> {
    let mut parts: Vec<String> = input.split(',').map(|p| p.trim().to_uppercase()).collect();
    let prefix = parts.pop().unwrap_or_default();
    if prefix.is_empty() {
        return Vec::new();
    }

    KNOWN_SYMBOLS
        .iter()
        .copied()
        .filter(|known| known.starts_with(&prefix) && *known != prefix)
        .filter(|known| !parts.iter().any(|p| p == known))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Replace the partially typed last entry of `input` with `symbol`.
pub fn complete(input: &str, symbol: &str) -> String {
    match input.rfind(',') {
        Some(idx) => format!("{}, {}", input[..idx].trim_end(), symbol),
        None => symbol.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_and_normalizes_comma_separated_input() {
        let symbols = parse_symbols(" aapl, MSFT ,,googl ").unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn empty_input_yields_no_symbols() {
        assert!(parse_symbols("").unwrap().is_empty());
        assert!(parse_symbols(" , ,").unwrap().is_empty());
    }

    #[test]
    fn rejects_every_non_alphanumeric_symbol() {
        match parse_symbols("AAPL, BRK.B, ^GSPC") {
            Err(EvalError::InvalidSymbols(bad)) => assert_eq!(bad, vec!["BRK.B", "^GSPC"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn reads_symbols_from_mixed_separators() {
        let reader = Cursor::new("aapl, msft\n\n  tsla amzn\n");
        let symbols = Symbol::parse_from_reader(reader).unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT", "TSLA", "AMZN"]);
    }

    #[test]
    fn suggests_known_symbols_for_last_entry() {
        assert_eq!(suggestions("msft, am"), vec!["AMZN", "AMGN"]);
        assert!(suggestions("msft, ").is_empty());
        assert!(suggestions("AAPL").is_empty());
        assert!(suggestions("x").len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn completes_last_entry() {
        assert_eq!(complete("msft, am", "AMZN"), "msft, AMZN");
        assert_eq!(complete("go", "GOOGL"), "GOOGL");
    }
}
