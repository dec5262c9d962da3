//! FILENAME: engine/src/dependency_graph.rs
//! PURPOSE: Tracks the dependency edges between cells.
//! CONTEXT: For every formula cell the graph keeps the set of cells its
//! expression reads (its sources) and the mirrored reverse map (its
//! dependents). Edges are position pairs; the cells themselves live in
//! the sheet. The graph answers two questions for the edit protocol:
//! "would this edit close a loop?" before a formula is committed, and
//! "which memos are stale?" after any commit.
//!
//! Both maps are kept in lockstep: an edge cell -> source exists in the
//! sources map iff source -> cell exists in the dependents map, and a
//! cell with no remaining dependents has no entry at all, so
//! `is_referenced` is a plain key lookup.

use std::collections::{HashMap, HashSet};

use crate::coord::Position;

/// The dependency graph. Maintains the source edges of every formula
/// cell together with the mirrored dependent edges.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// cell -> the cells its formula reads.
    sources: HashMap<Position, HashSet<Position>>,

    /// cell -> the formula cells that read it.
    dependents: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    /// Creates a new, empty dependency graph.
    pub fn new() -> Self {
        DependencyGraph::default()
    }

    /// Replaces the source set of a cell, mirroring every edge into the
    /// dependents map.
    ///
    /// Does NOT check for cycles; callers run `would_create_cycle` first.
    pub fn set_sources(&mut self, cell: Position, sources: HashSet<Position>) {
        self.clear_sources(cell);

        if sources.is_empty() {
            return;
        }
        for &source in &sources {
            self.dependents.entry(source).or_default().insert(cell);
        }
        self.sources.insert(cell, sources);
    }

    /// Detaches a cell from everything it reads. Call when a cell stops
    /// being a formula.
    pub fn clear_sources(&mut self, cell: Position) {
        let old_sources = match self.sources.remove(&cell) {
            Some(set) => set,
            None => return,
        };

        for source in old_sources {
            let emptied = match self.dependents.get_mut(&source) {
                Some(readers) => {
                    readers.remove(&cell);
                    readers.is_empty()
                }
                None => false,
            };
            // Emptied sets are dropped to keep `is_referenced` a key lookup.
            if emptied {
                self.dependents.remove(&source);
            }
        }
    }

    /// The cells a formula cell reads, if it reads any.
    pub fn sources(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.sources.get(&cell)
    }

    /// The formula cells reading this cell, if there are any.
    pub fn dependents(&self, cell: Position) -> Option<&HashSet<Position>> {
        self.dependents.get(&cell)
    }

    /// True iff at least one formula reads this cell.
    pub fn is_referenced(&self, cell: Position) -> bool {
        self.dependents.contains_key(&cell)
    }

    /// Checks whether giving `cell` the proposed sources would close a
    /// loop: that is, whether `cell` is reachable from any proposed
    /// source by walking source edges upstream. A proposed source with
    /// no graph entry (an absent or still-empty cell) reads nothing, so
    /// the walk ends there.
    ///
    /// The walk is seeded with every proposed source at once; popping
    /// `cell` itself also covers the self-reference case. Termination
    /// follows from the visited set plus the committed graph being
    /// acyclic.
    pub fn would_create_cycle(&self, cell: Position, proposed: &HashSet<Position>) -> bool {
        let mut pending: Vec<Position> = proposed.iter().copied().collect();
        let mut seen: HashSet<Position> = HashSet::new();

        while let Some(at) = pending.pop() {
            if at == cell {
                return true;
            }
            if !seen.insert(at) {
                continue;
            }
            if let Some(upstream) = self.sources.get(&at) {
                pending.extend(upstream.iter().copied());
            }
        }

        false
    }

    /// Every cell whose formula reads `cell` directly or through other
    /// formulas, `cell` itself excluded. These are the memos that go
    /// stale when `cell` changes.
    pub fn transitive_dependents(&self, cell: Position) -> HashSet<Position> {
        let mut stale: HashSet<Position> = HashSet::new();
        let mut frontier = vec![cell];

        while let Some(at) = frontier.pop() {
            if let Some(readers) = self.dependents.get(&at) {
                for &reader in readers {
                    if stale.insert(reader) {
                        frontier.push(reader);
                    }
                }
            }
        }

        stale
    }

    /// Number of cells that currently read other cells (formula cells).
    pub fn formula_cell_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.sources.values().map(HashSet::len).sum()
    }
}
