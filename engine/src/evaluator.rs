//! FILENAME: engine/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions to compute cell values.
//! CONTEXT: After a formula is parsed into an AST, this module traverses
//! the tree and computes the final numeric result. Referenced cells are
//! resolved lazily through the sheet; a referenced formula cell answers
//! from its own memo, so a chain of formulas evaluates each node at most
//! once. Errors are values: the first error encountered becomes the
//! result of the whole expression.

use parser::{BinaryOperator, Expression, UnaryOperator};

use crate::cell::CellKind;
use crate::coord::Position;
use crate::error::FormulaError;
use crate::sheet::Sheet;

/// The formula evaluator.
/// Holds a reference to the sheet for cell lookups.
pub struct Evaluator<'a> {
    sheet: &'a Sheet,
}

impl<'a> Evaluator<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Evaluator { sheet }
    }

    /// Evaluates an expression to a number, or the first error encountered.
    pub fn evaluate(&self, expr: &Expression) -> Result<f64, FormulaError> {
        match expr {
            Expression::Literal(n) => Ok(*n),

            Expression::CellRef(name) => self.resolve_reference(name),

            Expression::UnaryOp { op, operand } => {
                let value = self.evaluate(operand)?;
                Ok(match op {
                    UnaryOperator::Plus => value,
                    UnaryOperator::Negate => -value,
                })
            }

            Expression::BinaryOp { left, op, right } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                let result = match op {
                    BinaryOperator::Add => l + r,
                    BinaryOperator::Subtract => l - r,
                    BinaryOperator::Multiply => l * r,
                    BinaryOperator::Divide => l / r,
                    BinaryOperator::Power => l.powf(r),
                };
                // Division by zero and overflow land here as inf/NaN.
                if result.is_finite() {
                    Ok(result)
                } else {
                    Err(FormulaError::Arithmetic)
                }
            }
        }
    }

    /// Resolves a referenced cell to a number:
    /// - a reference outside the grid bounds is a reference error;
    /// - an absent or empty cell reads as 0;
    /// - a formula cell answers from its memo, re-propagating its error;
    /// - a text cell goes through strict numeric coercion of its value.
    fn resolve_reference(&self, name: &str) -> Result<f64, FormulaError> {
        let pos = Position::from_label(name);
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }

        let cell = match self.sheet.cell(pos) {
            Some(cell) => cell,
            None => return Ok(0.0),
        };

        match cell.kind() {
            CellKind::Empty => Ok(0.0),
            CellKind::Formula(formula) => formula.value(self.sheet),
            CellKind::Text(_) => coerce_text(cell.kind().value_text()),
        }
    }
}

/// Strict full-string numeric coercion of a text cell's value.
/// Empty reads as 0; whitespace or trailing garbage is a value error;
/// a parse that lands outside the finite range is an arithmetic error.
fn coerce_text(text: &str) -> Result<f64, FormulaError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        Ok(_) => Err(FormulaError::Arithmetic),
        Err(_) => Err(FormulaError::Value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(sheet: &Sheet, input: &str) -> Result<f64, FormulaError> {
        Evaluator::new(sheet).evaluate(&parser::parse(input).unwrap())
    }

    #[test]
    fn evaluates_arithmetic() {
        let sheet = Sheet::new();
        assert_eq!(eval(&sheet, "1+2*3"), Ok(7.0));
        assert_eq!(eval(&sheet, "(1+2)*3"), Ok(9.0));
        assert_eq!(eval(&sheet, "7/2"), Ok(3.5));
        assert_eq!(eval(&sheet, "2^10"), Ok(1024.0));
        assert_eq!(eval(&sheet, "-2^2"), Ok(-4.0));
        assert_eq!(eval(&sheet, "+3"), Ok(3.0));
    }

    #[test]
    fn division_by_zero_is_arithmetic_error() {
        let sheet = Sheet::new();
        assert_eq!(eval(&sheet, "1/0"), Err(FormulaError::Arithmetic));
        assert_eq!(eval(&sheet, "0/0"), Err(FormulaError::Arithmetic));
    }

    #[test]
    fn overflow_is_arithmetic_error() {
        let sheet = Sheet::new();
        assert_eq!(eval(&sheet, "2^10000"), Err(FormulaError::Arithmetic));
    }

    #[test]
    fn out_of_range_reference_is_ref_error() {
        let sheet = Sheet::new();
        assert_eq!(eval(&sheet, "AAAA1"), Err(FormulaError::Ref));
        assert_eq!(eval(&sheet, "A16385+1"), Err(FormulaError::Ref));
    }

    #[test]
    fn absent_cell_reads_as_zero() {
        let sheet = Sheet::new();
        assert_eq!(eval(&sheet, "A1+5"), Ok(5.0));
    }

    #[test]
    fn text_cells_coerce_strictly() {
        let mut sheet = Sheet::new();
        sheet.set_cell(Position::new(0, 0), "2.5").unwrap(); // A1
        sheet.set_cell(Position::new(1, 0), "two").unwrap(); // A2
        sheet.set_cell(Position::new(2, 0), " 2").unwrap(); // A3
        sheet.set_cell(Position::new(3, 0), "'3").unwrap(); // A4, escape consumed
        sheet.set_cell(Position::new(4, 0), "1e999").unwrap(); // A5

        assert_eq!(eval(&sheet, "A1*2"), Ok(5.0));
        assert_eq!(eval(&sheet, "A2+1"), Err(FormulaError::Value));
        assert_eq!(eval(&sheet, "A3+1"), Err(FormulaError::Value));
        assert_eq!(eval(&sheet, "A4+1"), Ok(4.0));
        assert_eq!(eval(&sheet, "A5+1"), Err(FormulaError::Arithmetic));
    }

    #[test]
    fn formula_cell_errors_propagate() {
        let mut sheet = Sheet::new();
        sheet.set_cell(Position::new(0, 0), "=1/0").unwrap(); // A1
        assert_eq!(eval(&sheet, "A1+1"), Err(FormulaError::Arithmetic));
    }

    #[test]
    fn coerce_text_policy() {
        assert_eq!(coerce_text(""), Ok(0.0));
        assert_eq!(coerce_text("42"), Ok(42.0));
        assert_eq!(coerce_text("-1.5"), Ok(-1.5));
        assert_eq!(coerce_text("4 "), Err(FormulaError::Value));
        assert_eq!(coerce_text("4x"), Err(FormulaError::Value));
        assert_eq!(coerce_text("inf"), Err(FormulaError::Arithmetic));
    }
}
