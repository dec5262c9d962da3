//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the fundamental data structures for a single spreadsheet cell.
//! CONTEXT: This file contains the `Cell` struct, its content variants
//! (`CellKind`) and the reader-facing `CellValue`. A cell is either empty,
//! literal text, or a parsed formula; the formula variant carries the
//! memoised evaluation result. Edge bookkeeping lives in the sheet's
//! dependency graph, not here.

use serde::{Deserialize, Serialize};

use crate::coord::Position;
use crate::error::FormulaError;
use crate::formula::Formula;
use crate::sheet::Sheet;
use parser::ParseError;

/// Marks the remainder of the cell text as a formula expression.
pub const FORMULA_SIGN: char = '=';
/// Suppresses formula interpretation; consumed when computing the value.
pub const ESCAPE_SIGN: char = '\'';

/// The computed value of a cell, as seen by a reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// The content stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    Empty,
    Text(String),
    Formula(Formula),
}

impl CellKind {
    /// Parses user input into a content variant.
    /// - Empty string -> Empty
    /// - "=" followed by anything -> Formula (may fail to parse)
    /// - Everything else, including a lone "=" or an escaped
    ///   "'=..." -> Text, stored verbatim
    pub fn from_input(input: &str) -> Result<CellKind, ParseError> {
        if input.is_empty() {
            return Ok(CellKind::Empty);
        }

        if let Some(expr) = input.strip_prefix(FORMULA_SIGN) {
            if !expr.is_empty() {
                return Ok(CellKind::Formula(Formula::parse(expr)?));
            }
        }

        Ok(CellKind::Text(input.to_string()))
    }

    /// The text as seen by value readers: the escape sign is consumed.
    /// Only the Text variant has a value text.
    pub fn value_text(&self) -> &str {
        match self {
            CellKind::Text(s) => s.strip_prefix(ESCAPE_SIGN).unwrap_or(s),
            _ => "",
        }
    }

    /// Positions referenced by the content, sorted and deduplicated.
    /// Empty for non-formula content.
    pub fn referenced_cells(&self) -> Vec<Position> {
        match self {
            CellKind::Formula(formula) => formula.referenced_cells(),
            _ => Vec::new(),
        }
    }
}

/// The atomic unit of the spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) kind: CellKind,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            kind: CellKind::Empty,
        }
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// The raw text of the cell, reconstructed for formulas:
    /// the formula sign plus the canonical expression.
    pub fn text(&self) -> String {
        match &self.kind {
            CellKind::Empty => String::new(),
            CellKind::Text(s) => s.clone(),
            CellKind::Formula(formula) => format!("{}{}", FORMULA_SIGN, formula.expression()),
        }
    }

    /// The computed value of the cell. Formula results are memoised in the
    /// cell and reset whenever an upstream cell changes.
    pub fn value(&self, sheet: &Sheet) -> CellValue {
        match &self.kind {
            CellKind::Empty => CellValue::Number(0.0),
            CellKind::Text(_) => CellValue::Text(self.kind.value_text().to_string()),
            CellKind::Formula(formula) => match formula.value(sheet) {
                Ok(n) => CellValue::Number(n),
                Err(e) => CellValue::Error(e),
            },
        }
    }

    /// Positions referenced by the cell's formula, sorted and deduplicated.
    /// Empty for non-formula cells.
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.kind.referenced_cells()
    }

    /// Discards the formula memo. No-op for non-formula cells.
    pub fn invalidate_cache(&self) {
        if let CellKind::Formula(formula) = &self.kind {
            formula.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_classifies_content() {
        assert!(matches!(CellKind::from_input("").unwrap(), CellKind::Empty));
        assert!(matches!(
            CellKind::from_input("hello").unwrap(),
            CellKind::Text(_)
        ));
        assert!(matches!(
            CellKind::from_input("=1+2").unwrap(),
            CellKind::Formula(_)
        ));
    }

    #[test]
    fn lone_formula_sign_is_text() {
        match CellKind::from_input("=").unwrap() {
            CellKind::Text(s) => assert_eq!(s, "="),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn escaped_formula_is_text() {
        let kind = CellKind::from_input("'=1+2").unwrap();
        match &kind {
            CellKind::Text(s) => assert_eq!(s, "'=1+2"),
            other => panic!("expected text, got {:?}", other),
        }
        assert_eq!(kind.value_text(), "=1+2");
    }

    #[test]
    fn escape_sign_is_consumed_only_once() {
        let kind = CellKind::from_input("''quoted").unwrap();
        assert_eq!(kind.value_text(), "'quoted");
    }

    #[test]
    fn bad_formula_is_a_parse_error() {
        assert!(CellKind::from_input("=1+").is_err());
        assert!(CellKind::from_input("=SUM(A1)").is_err());
    }

    #[test]
    fn formula_text_is_canonical() {
        let cell = Cell {
            kind: CellKind::from_input("=( 1 + 2 )*A1").unwrap(),
        };
        assert_eq!(cell.text(), "=(1+2)*A1");
    }

    #[test]
    fn empty_cell_reads_as_zero() {
        let sheet = Sheet::new();
        let cell = Cell::new_empty();
        assert_eq!(cell.value(&sheet), CellValue::Number(0.0));
        assert_eq!(cell.text(), "");
        assert!(cell.referenced_cells().is_empty());
    }

    #[test]
    fn cell_value_display() {
        assert_eq!(CellValue::Number(8.0).to_string(), "8");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(
            CellValue::Error(FormulaError::Value).to_string(),
            "#VALUE!"
        );
    }
}
