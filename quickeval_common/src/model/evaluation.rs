//! Result of running one valuation method against one symbol.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Qualitative outcome of a valuation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Verdict {
    /// The method considers the stock attractive.
    Positive,
    /// The method considers the stock unattractive, or evaluation failed.
    Negative,
    /// Neither (e.g. intrinsic value exactly equals market cap).
    Neutral,
}

/// Display text plus verdict for a single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Multi-line text shown in the cell.
    pub text: String,
    /// Tag that drives the cell color.
    pub verdict: Verdict,
}

impl Evaluation {
    /// Create an evaluation with the given text and verdict.
    pub fn new(text: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            text: text.into(),
            verdict,
        }
    }

    /// Error-tagged evaluation; failures are always shown as negative.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Verdict::Negative)
    }
}
