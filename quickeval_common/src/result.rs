//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `EvalError`, so functions can simply return `Result<T>`.
use crate::error::EvalError;

/// Workspace-wide `Result` alias with `EvalError` as the default error.
pub type Result<T, E = EvalError> = std::result::Result<T, E>;
