use glam::{DVec3, IVec3};

/// A lattice cell of the growth grid.
///
/// Cells are compared by value; two cells with the same coordinates are the
/// same cell.
pub type Cell = IVec3;

/// Position of a cell inside a [`crate::growth::ChargeGrid`].
///
/// Index `0` is the root. Indices grow with growth time, so a smaller index
/// was always charged earlier.
pub type CellIndex = usize;

/// Quantises a world-space point onto the lattice.
///
/// `grid_scale` is the world size of one cell; each axis is rounded to the
/// nearest cell.
pub fn cell_from_world(pos: DVec3, grid_scale: f64) -> Cell {
    let p = (pos / grid_scale).round();
    IVec3::new(p.x as i32, p.y as i32, p.z as i32)
}

/// World-space centre of `cell` for a lattice of spacing `grid_scale`.
#[inline]
pub fn cell_to_world(cell: Cell, grid_scale: f64) -> DVec3 {
    cell.as_dvec3() * grid_scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_round_trip_snaps_to_nearest_cell() {
        let scale = 0.25;
        let cell = cell_from_world(DVec3::new(0.26, -0.6, 1.0), scale);
        assert_eq!(cell, IVec3::new(1, -2, 4));
        assert_eq!(cell_to_world(cell, scale), DVec3::new(0.25, -0.5, 1.0));
    }
}
