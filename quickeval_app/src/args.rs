//! Command-line arguments for QuickEval.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use quickeval_common::Result;
use quickeval_common::model::Period;
use quickeval_common::tickers::{Symbol, SymbolParser};
use quickeval_engine::EngineConfig;
use quickeval_engine::config::{DEFAULT_CACHE_CAPACITY, DEFAULT_WORKERS};

/// Interval between two drains of the result queue, in milliseconds.
pub const DEFAULT_POLL_MS: u64 = 100;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Comma-separated ticker symbols to prefill, e.g. AAPL,MSFT,GOOGL.
    #[clap(long, default_value = "")]
    pub tickers: String,

    /// Path to a text file with more tickers.
    /// Tickers may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<PathBuf>,

    /// Period used for the price change column.
    #[clap(long, value_enum, default_value_t = Period::OneDay)]
    pub period: Period,

    /// Number of background workers.
    #[clap(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Maximum number of symbols kept in the data cache.
    #[clap(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// How often the window drains the result queue, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_POLL_MS)]
    pub poll_ms: u64,

    /// Append-only log file.
    #[clap(long, default_value = "app.log")]
    pub log_file: PathBuf,

    /// Start in dark mode.
    #[clap(long)]
    pub dark: bool,

    /// Start with colorblind-friendly verdict colors.
    #[clap(long)]
    pub colorblind: bool,

    /// Use synthetic market data instead of the network.
    #[clap(long)]
    pub offline: bool,

    /// Run every method once and print the table instead of opening a window.
    #[clap(long)]
    pub headless: bool,
}

impl Args {
    /// Engine settings derived from the arguments.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            workers: self.workers,
            cache_capacity: self.cache_capacity,
            offline: self.offline,
        }
    }

    /// Initial content of the ticker entry: `--tickers` followed by the `--path` file.
    pub fn initial_input(&self) -> Result<String> {
        let mut entries: Vec<String> = self
            .tickers
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(path) = &self.path {
            let reader = BufReader::new(File::open(path)?);
            entries.extend(
                Symbol::parse_from_reader(reader)?
                    .into_iter()
                    .map(|s| s.to_string()),
            );
        }
        Ok(entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_desktop_tool() {
        let args = Args::parse_from(["quickeval"]);
        assert_eq!(args.period, Period::OneDay);
        assert_eq!(args.poll_ms, 100);
        assert_eq!(args.engine_config(), EngineConfig::default());
        assert_eq!(args.initial_input().unwrap(), "");
    }

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "quickeval",
            "--tickers",
            "aapl, msft",
            "--period",
            "ytd",
            "--workers",
            "2",
            "--offline",
            "--headless",
        ]);
        assert_eq!(args.period, Period::YearToDate);
        assert_eq!(args.engine_config().workers, 2);
        assert!(args.engine_config().offline);
        assert!(args.headless);
        assert_eq!(args.initial_input().unwrap(), "aapl, msft");
    }
}
