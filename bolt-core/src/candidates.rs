//! Growth candidate sites: uncharged, uninsulated cells touching the charge
//! set, each carrying its current potential.

use crate::{stencil, types::Cell};
use std::collections::{HashMap, HashSet};

/// Cells adjacent to `charged` that are neither charged nor insulated.
///
/// Charged cells are visited in the given order and neighbours in stencil
/// order; the first occurrence of each cell is kept.
pub fn candidates_for(charged: &[Cell], insulators: &HashSet<Cell>) -> Vec<Cell> {
    let charged_set: HashSet<Cell> = charged.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for &c in charged {
        for n in stencil::neighbors(c) {
            if charged_set.contains(&n) || insulators.contains(&n) {
                continue;
            }
            if seen.insert(n) {
                out.push(n);
            }
        }
    }
    out
}

/// Ordered set of candidate cells with their potentials.
///
/// `cells[i]` and `potential[i]` describe the same site. Removal swaps the
/// last site into the hole, so iteration order depends only on the sequence
/// of inserts and removals, never on hashing.
#[derive(Debug, Default, Clone)]
pub struct CandidateSet {
    cells: Vec<Cell>,
    potential: Vec<f64>,
    index: HashMap<Cell, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.index.contains_key(cell)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn potentials(&self) -> &[f64] {
        &self.potential
    }

    /// Cells paired with mutable potentials.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Cell, &mut f64)> + '_ {
        self.cells.iter().copied().zip(self.potential.iter_mut())
    }

    pub fn potential_of(&self, cell: &Cell) -> Option<f64> {
        self.index.get(cell).map(|&i| self.potential[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, f64)> + '_ {
        self.cells.iter().copied().zip(self.potential.iter().copied())
    }

    /// Adds a site. Returns `false` and leaves the set untouched if the cell
    /// is already present.
    pub fn insert(&mut self, cell: Cell, potential: f64) -> bool {
        if self.index.contains_key(&cell) {
            return false;
        }
        self.index.insert(cell, self.cells.len());
        self.cells.push(cell);
        self.potential.push(potential);
        true
    }

    /// Removes a site and returns its potential.
    pub fn remove(&mut self, cell: &Cell) -> Option<f64> {
        let i = self.index.remove(cell)?;
        self.cells.swap_remove(i);
        let p = self.potential.swap_remove(i);
        if let Some(&moved) = self.cells.get(i) {
            self.index.insert(moved, i);
        }
        Some(p)
    }
}
