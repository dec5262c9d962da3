//! FILENAME: engine/src/sheet.rs
//! PURPOSE: Manages the collection of cells (the spreadsheet sheet).
//! CONTEXT: This file defines the `Sheet` struct which owns every cell and
//! the dependency graph between them, and runs the edit protocol: parse
//! the new content off to the side, reject edits that would create a
//! dependency cycle, then commit by swapping the content, rewiring the
//! graph and invalidating every downstream memo. Storage is a row-major
//! jagged rectangle that grows on write and never shrinks.

use std::collections::HashSet;

use crate::cell::{Cell, CellKind};
use crate::coord::Position;
use crate::dependency_graph::DependencyGraph;
use crate::error::SheetError;

/// The sheet holds the state of the spreadsheet data.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    /// Jagged storage: outer index is the row, inner index the column.
    /// A slot is None until a cell is materialised there. Rows may have
    /// different widths; reads past a row's end are absent.
    rows: Vec<Vec<Option<Cell>>>,

    /// Dependency edges between cells, keyed by position.
    graph: DependencyGraph,
}

impl Sheet {
    /// Creates a new, empty sheet.
    pub fn new() -> Self {
        Sheet::default()
    }

    /// Sets the text of the cell at `pos`, creating the cell if needed.
    ///
    /// All-or-nothing: a parse failure or a rejected cycle leaves the
    /// sheet exactly as it was (except that an absent target cell has
    /// been materialised as empty, which is not observable through any
    /// value). Setting the text a cell already has is a no-op and does
    /// not touch the graph or any memo.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }

        let current = self.materialize(pos).text();
        if current == text {
            return Ok(());
        }

        // Build the new content entirely off to the side. Every fallible
        // step happens before the first observable mutation.
        let new_kind = CellKind::from_input(text)?;
        let new_sources: HashSet<Position> = new_kind.referenced_cells().into_iter().collect();

        if self.graph.would_create_cycle(pos, &new_sources) {
            return Err(SheetError::CircularDependency);
        }

        // Commit: materialise referenced cells so their dependent edges
        // have a node to attach to, swap the content, rewire, invalidate.
        for &source in &new_sources {
            self.materialize(source);
        }
        self.materialize(pos).kind = new_kind;
        self.graph.set_sources(pos, new_sources);
        self.invalidate_downstream(pos);

        Ok(())
    }

    /// The cell at `pos`, or None if absent. Never grows storage.
    pub fn get_cell(&self, pos: Position) -> Result<Option<&Cell>, SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        Ok(self.cell(pos))
    }

    /// Unchecked lookup: None for invalid positions and absent cells.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if !pos.is_valid() {
            return None;
        }
        self.rows
            .get(pos.row as usize)?
            .get(pos.col as usize)?
            .as_ref()
    }

    /// Clears the cell at `pos`. A cell that no formula reads is dropped
    /// from storage entirely; a referenced cell is kept as an empty node
    /// so the dependent edges stay attached. Clearing an absent cell is a
    /// no-op.
    pub fn clear_cell(&mut self, pos: Position) -> Result<(), SheetError> {
        if !pos.is_valid() {
            return Err(SheetError::InvalidPosition(pos));
        }
        if self.cell(pos).is_none() {
            return Ok(());
        }

        // An empty write detaches the cell from its sources and
        // invalidates everything downstream; it cannot fail.
        self.set_cell(pos, "")?;

        if !self.graph.is_referenced(pos) {
            self.rows[pos.row as usize][pos.col as usize] = None;
        }

        Ok(())
    }

    /// True iff at least one formula reads the cell at `pos`.
    pub fn is_referenced(&self, pos: Position) -> bool {
        self.graph.is_referenced(pos)
    }

    /// The tight bounding rectangle (rows, cols) over all cells with
    /// non-empty text; (0, 0) for a sheet with no printable content.
    pub fn printable_size(&self) -> (i32, i32) {
        let mut rows = 0;
        let mut cols = 0;
        for (r, row) in self.rows.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                if let Some(cell) = slot {
                    if !cell.text().is_empty() {
                        rows = rows.max(r as i32 + 1);
                        cols = cols.max(c as i32 + 1);
                    }
                }
            }
        }
        (rows, cols)
    }

    /// Writes the computed values of the printable rectangle, one tab
    /// between cells and one newline after each row. Cells without text
    /// emit nothing between the separators.
    pub fn print_values<W: std::fmt::Write>(&self, out: &mut W) -> std::fmt::Result {
        self.print_with(out, |cell, sheet| cell.value(sheet).to_string())
    }

    /// Writes the raw texts of the printable rectangle in the same layout.
    pub fn print_texts<W: std::fmt::Write>(&self, out: &mut W) -> std::fmt::Result {
        self.print_with(out, |cell, _| cell.text())
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> std::fmt::Result
    where
        W: std::fmt::Write,
        F: Fn(&Cell, &Sheet) -> String,
    {
        let (rows, cols) = self.printable_size();
        for r in 0..rows {
            for c in 0..cols {
                if c > 0 {
                    out.write_char('\t')?;
                }
                if let Some(cell) = self.cell(Position::new(r, c)) {
                    if !cell.text().is_empty() {
                        out.write_str(&render(cell, self))?;
                    }
                }
            }
            out.write_char('\n')?;
        }
        Ok(())
    }

    /// Direct access to the dependency graph (read side).
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Ensures a cell node exists at `pos` and returns it. Appending rows
    /// extends the outer dimension; a write resizes its row to col + 1.
    fn materialize(&mut self, pos: Position) -> &mut Cell {
        let row = pos.row as usize;
        let col = pos.col as usize;

        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let slots = &mut self.rows[row];
        if slots.len() <= col {
            slots.resize_with(col + 1, || None);
        }
        slots[col].get_or_insert_with(Cell::new_empty)
    }

    /// Resets the memo of the cell at `pos` and of every transitive
    /// dependent. The edited cell is included: its own content just
    /// changed.
    fn invalidate_downstream(&mut self, pos: Position) {
        if let Some(cell) = self.cell(pos) {
            cell.invalidate_cache();
        }
        for dependent in self.graph.transitive_dependents(pos) {
            if let Some(cell) = self.cell(dependent) {
                cell.invalidate_cache();
            }
        }
    }
}
