//!
//! Common types and utilities shared by the analysis engine and the desktop app.
//!
//! This crate aggregates:
//! - `error`: unified error type `EvalError` used across the workspace.
//! - `result`: handy `Result<T, EvalError>` alias.
//! - `tickers`: symbol validation, file parsing and suggestions.
//! - `model`: financial snapshots, price changes, evaluations and UI messages.
//! - `valuation`: the five valuation methods.
//! - `display`: number formatting and word wrapping for table cells.
#![warn(missing_docs)]
pub mod display;
pub mod error;
pub mod model;
pub mod result;
pub mod tickers;
pub mod valuation;

pub use error::EvalError;
pub use result::Result;
pub use valuation::Method;
