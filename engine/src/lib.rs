//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the spreadsheet evaluation engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod coord;
pub mod dependency_extractor;
pub mod dependency_graph;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use cell::{Cell, CellKind, CellValue, ESCAPE_SIGN, FORMULA_SIGN};
pub use coord::{
    col_to_index, index_to_col, Position, MAX_COLS, MAX_POSITION_LENGTH, MAX_POS_LETTER_COUNT,
    MAX_ROWS,
};
pub use dependency_extractor::extract_references;
pub use dependency_graph::DependencyGraph;
pub use error::{FormulaError, SheetError};
pub use evaluator::Evaluator;
pub use formula::Formula;
pub use sheet::Sheet;

#[cfg(test)]
mod tests {
    use super::*;

    fn p(label: &str) -> Position {
        Position::from_label(label)
    }

    fn value(sheet: &Sheet, label: &str) -> CellValue {
        match sheet.cell(p(label)) {
            Some(cell) => cell.value(sheet),
            None => CellValue::Number(0.0),
        }
    }

    #[test]
    fn it_parses_and_reprints_formulas() {
        let formula = Formula::parse("(1+2)*A1").unwrap();
        assert_eq!(formula.expression(), "(1+2)*A1");
        assert_eq!(formula.referenced_cells(), vec![p("A1")]);
    }

    #[test]
    fn integration_literal_and_escape() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "hello").unwrap();
        assert_eq!(value(&sheet, "A1"), CellValue::Text("hello".to_string()));

        sheet.set_cell(p("A1"), "'=1+2").unwrap();
        assert_eq!(
            sheet.cell(p("A1")).unwrap().text(),
            "'=1+2"
        );
        assert_eq!(value(&sheet, "A1"), CellValue::Text("=1+2".to_string()));
    }

    #[test]
    fn integration_dependency_workflow() {
        let mut sheet = Sheet::new();

        // A1 = 10, B1 = 20, C1 = A1 + B1
        sheet.set_cell(p("A1"), "10").unwrap();
        sheet.set_cell(p("B1"), "20").unwrap();
        sheet.set_cell(p("C1"), "=A1+B1").unwrap();

        assert_eq!(value(&sheet, "C1"), CellValue::Number(30.0));
        assert!(sheet.graph().dependents(p("A1")).unwrap().contains(&p("C1")));
        assert!(sheet.graph().dependents(p("B1")).unwrap().contains(&p("C1")));

        // Editing an input reaches the dependent through the graph.
        sheet.set_cell(p("A1"), "15").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(35.0));
    }

    #[test]
    fn integration_cycle_prevention() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=B1").unwrap();
        sheet.set_cell(p("B2"), "=A1").unwrap();

        assert_eq!(
            sheet.set_cell(p("B1"), "=B2"),
            Err(SheetError::CircularDependency)
        );

        // The graph is still acyclic and the rejected cell still empty.
        assert_eq!(sheet.cell(p("B1")).unwrap().text(), "");
        assert_eq!(value(&sheet, "A1"), CellValue::Number(0.0));
    }

    #[test]
    fn integration_error_propagation_chain() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "=1/0").unwrap();
        sheet.set_cell(p("B1"), "=A1+1").unwrap();
        sheet.set_cell(p("C1"), "=B1*2").unwrap();

        assert_eq!(
            value(&sheet, "C1"),
            CellValue::Error(FormulaError::Arithmetic)
        );

        // Fixing the root heals the whole chain.
        sheet.set_cell(p("A1"), "=1/2").unwrap();
        assert_eq!(value(&sheet, "C1"), CellValue::Number(3.0));
    }

    #[test]
    fn integration_printing() {
        let mut sheet = Sheet::new();
        sheet.set_cell(p("A1"), "2").unwrap();
        sheet.set_cell(p("A2"), "3").unwrap();
        sheet.set_cell(p("B2"), "=A1+A2").unwrap();

        let mut values = String::new();
        sheet.print_values(&mut values).unwrap();
        assert_eq!(values, "2\t\n3\t5\n");

        let mut texts = String::new();
        sheet.print_texts(&mut texts).unwrap();
        assert_eq!(texts, "2\t\n3\t=A1+A2\n");
    }

    #[test]
    fn integration_codec_edges() {
        assert_eq!(Position::from_label("A1"), Position::new(0, 0));
        assert_eq!(Position::from_label("AA1"), Position::new(0, 26));
        assert_eq!(Position::from_label(""), Position::NONE);
        assert_eq!(Position::from_label("a1"), Position::NONE);
        assert_eq!(Position::from_label("A0"), Position::NONE);
        assert_eq!(Position::from_label("AAAA1"), Position::NONE);
    }

    #[test]
    fn integration_serde_of_reader_types() {
        let value = CellValue::Error(FormulaError::Ref);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);
    }
}
