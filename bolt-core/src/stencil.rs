//! 26-connected neighbourhood of a lattice cell.

use crate::types::Cell;
use glam::IVec3;

/// Offsets of the 26-neighbourhood, ordered by `dz`, then `dy`, then `dx`.
///
/// Every consumer scans neighbours in this order, which keeps candidate
/// ordering and parent assignment reproducible.
pub const NEIGHBOR_OFFSETS: [IVec3; 26] = {
    let mut out = [IVec3::ZERO; 26];
    let mut n = 0;
    let mut dz = -1;
    while dz <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dx = -1;
            while dx <= 1 {
                if !(dx == 0 && dy == 0 && dz == 0) {
                    out[n] = IVec3::new(dx, dy, dz);
                    n += 1;
                }
                dx += 1;
            }
            dy += 1;
        }
        dz += 1;
    }
    out
};

/// Returns the 26 cells surrounding `cell`.
#[inline]
pub fn neighbors(cell: Cell) -> [Cell; 26] {
    NEIGHBOR_OFFSETS.map(|off| cell + off)
}

/// Returns `true` if `a` and `b` are distinct and touch by face, edge or corner.
#[inline]
pub fn is_adjacent(a: Cell, b: Cell) -> bool {
    let d = (a - b).abs();
    a != b && d.max_element() <= 1
}
