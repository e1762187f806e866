//! Point charges that shape the potential field without being part of the
//! charge grid: the ground plane and attractor ("cloud") cells.

use crate::types::Cell;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A fixed charge at an arbitrary point in lattice space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCharge {
    pub pos: DVec3,
    pub charge: f64,
}

impl PointCharge {
    pub fn new(pos: DVec3, charge: f64) -> Self {
        Self { pos, charge }
    }

    /// Charge sitting at the centre of `cell`.
    pub fn at_cell(cell: Cell, charge: f64) -> Self {
        Self::new(cell.as_dvec3(), charge)
    }
}

/// Grounded plane below the origin.
///
/// A grown cell whose `z` equals the plane height counts as a ground strike.
/// The kernel `1 - R1 / r` grows with distance, so a charge pulls growth
/// towards itself only when it is negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundPlane {
    pub enabled: bool,
    pub z: i32,
    pub charge: f64,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            enabled: false,
            z: -32,
            charge: -250.0,
        }
    }
}

impl GroundPlane {
    pub fn at(z: i32, charge: f64) -> Self {
        Self {
            enabled: true,
            z,
            charge,
        }
    }

    /// Point charges standing in for the plane.
    ///
    /// One charge sits straight below the lattice origin and four more sit
    /// `|z| / 2` away from it along the x and y axes, all at height `z`.
    /// Returns nothing when the plane is disabled.
    pub fn point_charges(&self) -> Vec<PointCharge> {
        if !self.enabled {
            return Vec::new();
        }
        let z = self.z as f64;
        let xy = z.abs() / 2.0;
        [
            DVec3::new(0.0, 0.0, z),
            DVec3::new(xy, 0.0, z),
            DVec3::new(0.0, xy, z),
            DVec3::new(-xy, 0.0, z),
            DVec3::new(0.0, -xy, z),
        ]
        .into_iter()
        .map(|pos| PointCharge::new(pos, self.charge))
        .collect()
    }

    /// Returns `true` if `cell` lies on an enabled plane.
    #[inline]
    pub fn is_struck_by(&self, cell: Cell) -> bool {
        self.enabled && cell.z == self.z
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    pub cell: Cell,
    pub charge: f64,
}

/// Attractor ("cloud") cells. Reaching any of them ends growth.
///
/// Like the ground plane, attractors need a negative charge to pull.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttractorSet {
    pub points: Vec<Attractor>,
}

impl AttractorSet {
    pub fn from_cells(cells: Vec<(Cell, f64)>) -> Self {
        let points = cells
            .into_iter()
            .map(|(cell, charge)| Attractor { cell, charge })
            .collect();

        Self { points }
    }

    /// Every cell in `cells` with the same `charge`.
    pub fn uniform(cells: impl IntoIterator<Item = Cell>, charge: f64) -> Self {
        Self::from_cells(cells.into_iter().map(|c| (c, charge)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point_charges(&self) -> Vec<PointCharge> {
        self.points
            .iter()
            .map(|a| PointCharge::at_cell(a.cell, a.charge))
            .collect()
    }

    /// Cell lookup table for strike tests.
    pub fn cell_set(&self) -> HashSet<Cell> {
        self.points.iter().map(|a| a.cell).collect()
    }
}
