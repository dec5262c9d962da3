//! FILENAME: engine/src/dependency_extractor.rs
//! PURPOSE: Extracts cell references from parsed AST expressions.
//! CONTEXT: After a formula is parsed into an AST, this module walks the
//! tree to find all cell references. These references feed the dependency
//! graph and the read-side `referenced_cells` surface. References that do
//! not decode to a valid position carry no dependency; evaluation turns
//! them into reference errors.

use parser::Expression;

use crate::coord::Position;

/// Collects every valid cell reference in the expression,
/// sorted and deduplicated.
pub fn extract_references(expr: &Expression) -> Vec<Position> {
    let mut refs = Vec::new();
    collect(expr, &mut refs);
    refs.sort();
    refs.dedup();
    refs
}

fn collect(expr: &Expression, refs: &mut Vec<Position>) {
    match expr {
        Expression::Literal(_) => {}

        Expression::CellRef(name) => {
            let pos = Position::from_label(name);
            if pos.is_valid() {
                refs.push(pos);
            }
        }

        Expression::UnaryOp { operand, .. } => collect(operand, refs),

        Expression::BinaryOp { left, right, .. } => {
            collect(left, refs);
            collect(right, refs);
        }
    }
}
