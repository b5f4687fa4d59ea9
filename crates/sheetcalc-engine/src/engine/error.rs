//! Per-cell evaluation failures.

use thiserror::Error;

use super::format::{ERR_CYCLE, ERR_FORM};

/// Why a formula cell failed to produce a number.
///
/// Failures are scoped to a single cell: the cell shows an error token and
/// evaluation of the rest of the grid carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// Reference is malformed or outside the grid.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Reference points at a text cell or a cell that is itself in error.
    #[error("referenced cell {0} is not a number")]
    NonNumericReference(String),

    #[error("division by zero")]
    DivideByZero,

    #[error("malformed expression")]
    MalformedExpression,

    #[error("circular reference")]
    Cycle,
}

impl FormulaError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, FormulaError::Cycle)
    }

    /// The fixed display token for this failure.
    pub fn token(&self) -> &'static str {
        if self.is_cycle() { ERR_CYCLE } else { ERR_FORM }
    }
}
