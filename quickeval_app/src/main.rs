//! QuickEval: a desktop tool that fetches company financial statements and scores
//! each ticker with five value-investing heuristics (Buffett, Brandes,
//! Hartz/Millsap/Hill, Pabrai and Hempton Nutty), next to its price change over
//! a selectable period.
//!
//! Usage example (CLI):
//! ```bash
//! quickeval --tickers AAPL,MSFT --period 5d --dark
//! quickeval --path ./tickers.txt --offline --headless
//! ```
//!
//! The ticker file should contain symbols separated by commas, spaces, or new lines.
//! Everything is logged to `app.log` (see `--log-file`).
#![warn(missing_docs)]
mod app;
mod args;
mod headless;
mod logging;
mod table;
mod theme;

use std::time::Duration;

use clap::Parser;
use crossbeam_channel::unbounded;
use eframe::egui;
use log::{error, info};
use quickeval_common::model::UiMessage;
use quickeval_common::{EvalError, Result};
use quickeval_engine::Analyzer;

use crate::app::{QuickEvalApp, WINDOW_SIZE, WINDOW_TITLE};
use crate::args::Args;
use crate::logging::init_logger;
use crate::theme::Theme;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_file)?;
    info!("Starting with {:?}", args);

    let input = args.initial_input()?;
    let config = args.engine_config();
    let provider = config.provider()?;
    let (ui_tx, ui_rx) = unbounded::<UiMessage>();
    let analyzer = Analyzer::new(&config, provider, ui_tx)?;

    if args.headless {
        return headless::run(&analyzer, &ui_rx, &input, args.period).inspect_err(|e| {
            error!("Headless run failed: {}", e);
        });
    }

    let theme = Theme {
        dark: args.dark,
        colorblind: args.colorblind,
    };
    let app = QuickEvalApp::new(
        analyzer,
        ui_rx,
        input,
        args.period,
        theme,
        Duration::from_millis(args.poll_ms),
    );
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(WINDOW_TITLE, native_options, Box::new(|_cc| Box::new(app))).map_err(|e| {
        error!("Window error: {}", e);
        EvalError::Ui(e.to_string())
    })?;
    info!("Window closed");
    Ok(())
}
