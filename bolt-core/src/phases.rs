//! Phases of a single growth step.
//!
//! [`crate::growth::GrowthEngine::step`] runs them in this order:
//! 1. [`selection_phase`]: turn candidate potentials into weights and draw
//!    one site.
//! 2. [`commit_phase`]: charge the drawn site and fold its contribution
//!    into the remaining candidates.
//! 3. [`expansion_phase`]: add the new site's free neighbours as
//!    candidates.
//! 4. [`strike_phase`]: decide whether the new site ends the run.

use crate::{
    candidates::CandidateSet,
    charges::{GroundPlane, PointCharge},
    grid::ChargeGrid,
    potential::{self, growth_probabilities},
    stencil,
    types::{Cell, CellIndex},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `max_steps` cells were grown.
    StepBudget,
    /// No candidate sites remain, e.g. the structure is walled in by insulators.
    Exhausted,
    /// A grown cell reached the ground plane.
    GroundStrike,
    /// A grown cell landed on an attractor.
    CloudStrike,
    /// Candidates exist but none carries a positive weight.
    DegenerateSampling,
}

/// Draws one cell by inverse-CDF sampling over `weights`.
///
/// Only strictly positive weights enter the running-sum table. A value `r`
/// is drawn uniformly from `[0, total)` and the first cell whose cumulative
/// weight exceeds `r` wins.
///
/// ### Returns
/// `None` if no weight is positive.
pub fn pick_weighted(cells: &[Cell], weights: &[f64], rng: &mut impl Rng) -> Option<Cell> {
    let mut table = Vec::with_capacity(cells.len());
    let mut running = 0.0;
    for (&cell, &w) in cells.iter().zip(weights) {
        if w > 0.0 {
            running += w;
            table.push((cell, running));
        }
    }

    if table.is_empty() || running <= 0.0 {
        return None;
    }

    let r = rng.random::<f64>() * running;
    table
        .iter()
        .find(|(_, cum)| *cum > r)
        .or(table.last())
        .map(|&(cell, _)| cell)
}

/// Picks the next cell to grow.
///
/// ### Parameters
/// - `candidates` - Current candidate sites with their potentials.
/// - `bias_exponent` - Exponent `u` applied to normalised potentials.
/// - `rng` - Source of the uniform draw.
///
/// ### Returns
/// The chosen cell, or `None` when sampling is degenerate.
pub fn selection_phase(
    candidates: &CandidateSet,
    bias_exponent: f64,
    rng: &mut impl Rng,
) -> Option<Cell> {
    let w = growth_probabilities(candidates.potentials(), bias_exponent);
    if w.total <= 0.0 {
        return None;
    }
    pick_weighted(candidates.cells(), &w.weights, rng)
}

/// Charges `cell`: appends it to the grid, drops it from the candidates and
/// adds its unit contribution to every remaining candidate.
///
/// ### Returns
/// The grid index of the new cell, or `None` if `cell` was already charged,
/// in which case nothing changes.
pub fn commit_phase(
    grid: &mut ChargeGrid,
    candidates: &mut CandidateSet,
    cell: Cell,
) -> Option<CellIndex> {
    let index = grid.push(cell)?;
    candidates.remove(&cell);
    potential::incremental_update(cell, candidates);
    Some(index)
}

/// Adds the free neighbours of `cell` to the candidate set.
///
/// A neighbour is free when it is not charged, not already a candidate and
/// not insulated. Its potential is computed from the whole grid plus the
/// `external` charges.
///
/// ### Returns
/// How many candidates were added.
pub fn expansion_phase(
    grid: &ChargeGrid,
    candidates: &mut CandidateSet,
    insulators: &HashSet<Cell>,
    external: &[PointCharge],
    cell: Cell,
) -> usize {
    let mut added = 0;
    for n in stencil::neighbors(cell) {
        if grid.contains(&n) || candidates.contains(&n) || insulators.contains(&n) {
            continue;
        }
        let p = potential::grid_potential(n, grid.cells(), external);
        candidates.insert(n, p);
        added += 1;
    }
    added
}

/// Checks whether the freshly grown `cell` ends the run by striking ground
/// or an attractor.
pub fn strike_phase(ground: &GroundPlane, cloud: &HashSet<Cell>, cell: Cell) -> Option<StopReason> {
    if ground.is_struck_by(cell) {
        Some(StopReason::GroundStrike)
    } else if cloud.contains(&cell) {
        Some(StopReason::CloudStrike)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::candidates_for;
    use glam::IVec3;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn pick_weighted_never_picks_zero_weight_cells() {
        let cells = [IVec3::X, IVec3::Y, IVec3::Z];
        let weights = [0.0, 1.0, 0.0];
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            assert_eq!(pick_weighted(&cells, &weights, &mut rng), Some(IVec3::Y));
        }
    }

    #[test]
    fn pick_weighted_without_positive_weight_is_none() {
        let cells = [IVec3::X, IVec3::Y];
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(pick_weighted(&cells, &[0.0, 0.0], &mut rng), None);
        assert_eq!(pick_weighted(&cells, &[f64::NAN, -1.0], &mut rng), None);
        assert_eq!(pick_weighted(&[], &[], &mut rng), None);
    }

    #[test]
    fn pick_weighted_roughly_follows_weights() {
        let cells = [IVec3::X, IVec3::Y];
        let weights = [1.0, 3.0];
        let mut rng = StdRng::seed_from_u64(11);

        let n = 4000;
        let hits_y = (0..n)
            .filter(|_| pick_weighted(&cells, &weights, &mut rng) == Some(IVec3::Y))
            .count();
        let frac = hits_y as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.05, "observed {frac}");
    }

    #[test]
    fn selection_phase_on_empty_set_is_none() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(selection_phase(&CandidateSet::new(), 1.0, &mut rng), None);
    }

    #[test]
    fn commit_and_expand_move_frontier() {
        let mut grid = ChargeGrid::from_cells([IVec3::ZERO]);
        let mut cands = CandidateSet::new();
        for c in candidates_for(grid.cells(), &HashSet::new()) {
            cands.insert(c, potential::grid_potential(c, grid.cells(), &[]));
        }
        assert_eq!(cands.len(), 26);

        let target = IVec3::new(0, 0, -1);
        let index = commit_phase(&mut grid, &mut cands, target);
        assert_eq!(index, Some(1));
        assert!(!cands.contains(&target));
        assert_eq!(cands.len(), 25);

        let added = expansion_phase(&grid, &mut cands, &HashSet::new(), &[], target);
        // The layer at z = -2 is new, the rest was already a frontier.
        assert_eq!(added, 9);
        assert_eq!(cands.len(), 34);
        assert!(cands.cells().iter().all(|c| !grid.contains(c)));
    }

    #[test]
    fn commit_of_charged_cell_changes_nothing() {
        let mut grid = ChargeGrid::from_cells([IVec3::ZERO, IVec3::X]);
        let mut cands = CandidateSet::new();
        cands.insert(IVec3::Y, 0.25);

        assert_eq!(commit_phase(&mut grid, &mut cands, IVec3::X), None);
        assert_eq!(grid.len(), 2);
        assert_eq!(cands.potential_of(&IVec3::Y), Some(0.25));
    }

    #[test]
    fn expansion_skips_insulators() {
        let grid = ChargeGrid::from_cells([IVec3::ZERO]);
        let mut cands = CandidateSet::new();
        let insulators: HashSet<_> = [IVec3::X, IVec3::Y].into_iter().collect();

        let added = expansion_phase(&grid, &mut cands, &insulators, &[], IVec3::ZERO);
        assert_eq!(added, 24);
        assert!(!cands.contains(&IVec3::X));
    }

    #[test]
    fn strike_phase_detects_ground_then_cloud() {
        let ground = GroundPlane::at(-3, 1.0);
        let cloud: HashSet<_> = [IVec3::new(0, 0, 4)].into_iter().collect();

        assert_eq!(
            strike_phase(&ground, &cloud, IVec3::new(2, 2, -3)),
            Some(StopReason::GroundStrike)
        );
        assert_eq!(
            strike_phase(&ground, &cloud, IVec3::new(0, 0, 4)),
            Some(StopReason::CloudStrike)
        );
        assert_eq!(strike_phase(&ground, &cloud, IVec3::ZERO), None);
    }
}
