//! FILENAME: engine/src/error.rs
//! PURPOSE: Typed errors for the evaluation core.
//! CONTEXT: Sheet edits fail with `SheetError` and leave the sheet
//! untouched. Formula evaluation never fails the edit: it produces a
//! `FormulaError` *value* that becomes the cell's result and propagates
//! to dependent formulas.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::Position;

/// An error produced while evaluating a formula.
/// Printed with the user-visible sigils.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaError {
    /// Reference to a position outside the grid bounds.
    #[error("#REF!")]
    Ref,

    /// A referenced text cell whose value cannot be read as a number.
    #[error("#VALUE!")]
    Value,

    /// Division by zero, overflow, or any other non-finite result.
    #[error("#ARITHM!")]
    Arithmetic,
}

/// Errors raised by sheet edit and lookup operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("invalid position ({}, {})", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("formula error: {0}")]
    Formula(String),

    #[error("circular dependency")]
    CircularDependency,
}

impl From<parser::ParseError> for SheetError {
    fn from(err: parser::ParseError) -> Self {
        SheetError::Formula(err.message)
    }
}
