//! The desktop window.
//!
//! `QuickEvalApp` owns the ticker entry, the option toggles, the result table and
//! the pending dialogs. Button clicks hand work to the `Analyzer`; results come
//! back through the `UiMessage` queue, which is drained on every frame. A repaint
//! is requested every `poll_ms` so the queue is drained even while the user is idle.

use std::collections::VecDeque;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use eframe::egui::{self, Align2, Color32, RichText};
use log::{debug, error, info};
use quickeval_common::Method;
use quickeval_common::model::{Period, TableRow, UiMessage};
use quickeval_common::tickers::{self, Symbol, parse_symbols};
use quickeval_engine::Analyzer;
use strum::IntoEnumIterator;

use crate::table::{Dialog, ResultTable};
use crate::theme::Theme;

/// Title of the main window.
pub const WINDOW_TITLE: &str = "Comprehensive Stock Analysis Tool";
/// Initial window size in points.
pub const WINDOW_SIZE: [f32; 2] = [1600.0, 900.0];

const TICKER_TOOLTIP: &str = "Enter ticker symbols separated by commas. Example: AAPL,MSFT,GOOGL";
const RUN_ALL_TOOLTIP: &str = "Run all analysis methods";
const TICKER_HEADER: &str = "Ticker";
const PRICE_HEADER: &str = "Current Price";

/// What a button asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Single(Method),
    All,
}

/// Parse the ticker entry, turning invalid input into an `Input Error` dialog.
///
/// `Ok(None)` means there is nothing to run.
fn symbols_for_request(input: &str) -> Result<Option<Vec<Symbol>>, Dialog> {
    match parse_symbols(input) {
        Ok(symbols) if symbols.is_empty() => Ok(None),
        Ok(symbols) => Ok(Some(symbols)),
        Err(e) => Err(Dialog {
            title: "Input Error".to_string(),
            message: e.to_string(),
        }),
    }
}

/// eframe application state.
pub struct QuickEvalApp {
    analyzer: Analyzer,
    ui_rx: Receiver<UiMessage>,
    input: String,
    period: Period,
    theme: Theme,
    applied_theme: Option<Theme>,
    table: ResultTable,
    dialogs: VecDeque<Dialog>,
    poll_interval: Duration,
}

impl QuickEvalApp {
    pub fn new(
        analyzer: Analyzer,
        ui_rx: Receiver<UiMessage>,
        input: String,
        period: Period,
        theme: Theme,
        poll_interval: Duration,
    ) -> Self {
        Self {
            analyzer,
            ui_rx,
            input,
            period,
            theme,
            applied_theme: None,
            table: ResultTable::default(),
            dialogs: VecDeque::new(),
            poll_interval,
        }
    }

    /// Apply every message currently queued.
    fn drain_queue(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(message) => {
                    if let Some(dialog) = self.table.apply(message) {
                        self.dialogs.push_back(dialog);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Result queue disconnected");
                    break;
                }
            }
        }
    }

    fn submit(&mut self, request: Request) {
        let symbols = match symbols_for_request(&self.input) {
            Ok(Some(symbols)) => symbols,
            Ok(None) => return,
            Err(dialog) => {
                self.dialogs.push_back(dialog);
                return;
            }
        };

        let result = match request {
            Request::Single(method) => self.analyzer.run_method(symbols, method, self.period),
            Request::All => self.analyzer.run_all(symbols, self.period),
        };
        if let Err(e) = result {
            error!("Could not schedule {:?}: {}", request, e);
            self.dialogs.push_back(Dialog {
                title: "Error".to_string(),
                message: e.to_string(),
            });
        }
    }

    fn input_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Enter Ticker Symbol(s):").on_hover_text(TICKER_TOOLTIP);
            ui.add(egui::TextEdit::singleline(&mut self.input).desired_width(400.0))
                .on_hover_text(TICKER_TOOLTIP);

            ui.add_space(20.0);
            ui.label("Select Period:");
            egui::ComboBox::from_id_source("period")
                .selected_text(self.period.to_string())
                .show_ui(ui, |ui| {
                    for period in Period::iter() {
                        ui.selectable_value(&mut self.period, period, period.to_string());
                    }
                });

            ui.add_space(20.0);
            ui.checkbox(&mut self.theme.colorblind, "Colorblind Mode");
            ui.checkbox(&mut self.theme.dark, "Dark Mode");
        });

        let suggestions = tickers::suggestions(&self.input);
        if !suggestions.is_empty() {
            ui.horizontal_wrapped(|ui| {
                for symbol in suggestions {
                    if ui.small_button(symbol).clicked() {
                        self.input = tickers::complete(&self.input, symbol);
                    }
                }
            });
        }
    }

    fn button_row(&mut self, ui: &mut egui::Ui) -> Option<Request> {
        let palette = self.theme.palette();
        let mut request = None;
        ui.horizontal(|ui| {
            for method in Method::ALL {
                let button = egui::Button::new(RichText::new(method.button_label()).color(Color32::WHITE))
                    .fill(palette.button);
                if ui.add(button).on_hover_text(method.tooltip()).clicked() {
                    request = Some(Request::Single(method));
                }
            }
            let run_all = egui::Button::new(RichText::new("Run All").color(Color32::WHITE))
                .fill(palette.accent);
            if ui.add(run_all).on_hover_text(RUN_ALL_TOOLTIP).clicked() {
                request = Some(Request::All);
            }
        });
        request
    }

    fn result_grid(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("results")
                .num_columns(Method::COUNT + 2)
                .striped(true)
                .min_col_width(120.0)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    ui.strong(TICKER_HEADER);
                    for method in Method::ALL {
                        ui.strong(method.to_string());
                    }
                    ui.strong(PRICE_HEADER);
                    ui.end_row();

                    for row in self.table.rows() {
                        self.result_row(ui, row);
                        ui.end_row();
                    }
                });
        });
    }

    fn result_row(&self, ui: &mut egui::Ui, row: &TableRow) {
        ui.label(row.symbol.as_str());
        for method in Method::ALL {
            match row.cell(method) {
                Some(cell) => {
                    ui.colored_label(self.theme.verdict_color(cell.verdict), cell.text.as_str());
                }
                None => {
                    ui.label("");
                }
            }
        }
        ui.label(row.price.as_str());
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialogs.front() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(dialog.title.as_str())
            .id(egui::Id::new("dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(dialog.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.dialogs.pop_front();
        }
    }
}

impl eframe::App for QuickEvalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.applied_theme != Some(self.theme) {
            info!(
                "Theme changed: dark={}, colorblind={}",
                self.theme.dark, self.theme.colorblind
            );
            self.theme.apply(ctx);
            self.applied_theme = Some(self.theme);
        }

        self.drain_queue();

        let mut request = None;
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(10.0);
            self.input_row(ui);
            ui.add_space(10.0);
            request = self.button_row(ui);
            ui.add_space(10.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| self.result_grid(ui));
        self.show_dialog(ctx);

        if let Some(request) = request {
            self.submit(request);
        }
        ctx.request_repaint_after(self.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_runs_nothing() {
        assert_eq!(symbols_for_request("  , ").unwrap(), None);
    }

    #[test]
    fn invalid_input_opens_an_input_error() {
        let dialog = symbols_for_request("AAPL, BRK.B, $$").unwrap_err();
        assert_eq!(dialog.title, "Input Error");
        assert_eq!(dialog.message, "Invalid symbols: BRK.B, $$");
    }

    #[test]
    fn valid_input_is_normalized() {
        let symbols = symbols_for_request("aapl,msft").unwrap().unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["AAPL", "MSFT"]);
    }
}
