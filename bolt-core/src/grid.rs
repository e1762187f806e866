use crate::types::{Cell, CellIndex, cell_to_world};
use glam::{DVec3, IVec3};
use std::collections::HashSet;

/// Grown cells in growth order.
///
/// Index `0` is the root. The grid only ever grows; a cell appears at most
/// once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeGrid {
    cells: Vec<Cell>,
    lookup: HashSet<Cell>,
}

impl ChargeGrid {
    /// Builds a grid from cells already in growth order, dropping repeats.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut grid = Self::default();
        for c in cells {
            grid.push(c);
        }
        grid
    }

    /// Reads a grid from plain integer triples, e.g. a previously saved run.
    pub fn from_triples(triples: &[(i32, i32, i32)]) -> Self {
        Self::from_cells(triples.iter().map(|&(x, y, z)| IVec3::new(x, y, z)))
    }

    /// Appends `cell` and returns its index, or `None` if it is already charged.
    pub fn push(&mut self, cell: Cell) -> Option<CellIndex> {
        if !self.lookup.insert(cell) {
            return None;
        }
        self.cells.push(cell);
        Some(self.cells.len() - 1)
    }

    #[inline]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.lookup.contains(cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: CellIndex) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Index of the most recently grown cell.
    pub fn last_index(&self) -> Option<CellIndex> {
        self.cells.len().checked_sub(1)
    }

    pub fn to_triples(&self) -> Vec<(i32, i32, i32)> {
        self.cells.iter().map(|c| (c.x, c.y, c.z)).collect()
    }

    /// Cell centres in world space.
    pub fn world_positions(&self, grid_scale: f64) -> Vec<DVec3> {
        self.cells
            .iter()
            .map(|&c| cell_to_world(c, grid_scale))
            .collect()
    }
}
