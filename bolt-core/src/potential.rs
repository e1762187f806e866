use crate::{candidates::CandidateSet, charges::PointCharge, types::Cell};
use glam::DVec3;

/// Minimum separation term of the potential kernel.
///
/// A charge at distance `r` contributes `1 - R1 / r`, so the kernel stays
/// finite for every pair of distinct lattice cells.
pub const R1: f64 = 0.5;

/// Padding applied to both bounds when every candidate has the same potential.
pub const FLAT_FIELD_EPSILON: f64 = 1e-10;

/// Unit kernel value of a charge at `source` seen from `at`.
///
/// Returns `None` when the two points coincide; such a charge is skipped.
#[inline]
fn kernel(at: DVec3, source: DVec3) -> Option<f64> {
    let r = at.distance(source);
    if r == 0.0 { None } else { Some(1.0 - R1 / r) }
}

/// Potential at `cell` from an arbitrary list of point charges.
pub fn potential_at(cell: Cell, charges: &[PointCharge]) -> f64 {
    let at = cell.as_dvec3();
    charges
        .iter()
        .filter_map(|c| kernel(at, c.pos).map(|k| k * c.charge))
        .sum()
}

/// Potential at `cell` from unit charges on every `grown` cell plus the
/// `external` charges.
pub fn grid_potential(cell: Cell, grown: &[Cell], external: &[PointCharge]) -> f64 {
    let at = cell.as_dvec3();
    let own: f64 = grown
        .iter()
        .filter_map(|g| kernel(at, g.as_dvec3()))
        .sum();
    own + potential_at(cell, external)
}

/// Potential of every candidate from scratch.
///
/// ### Parameters
/// - `charges` - All active charges, grown cells included.
/// - `candidates` - Sites to evaluate.
///
/// ### Returns
/// One potential per candidate, in the same order.
pub fn initial_potentials(charges: &[PointCharge], candidates: &[Cell]) -> Vec<f64> {
    candidates.iter().map(|&c| potential_at(c, charges)).collect()
}

/// Adds the unit contribution of a freshly grown cell to every candidate.
///
/// Equivalent to recomputing [`initial_potentials`] with `new_charge` added
/// as a unit charge, up to floating-point rounding.
pub fn incremental_update(new_charge: Cell, candidates: &mut CandidateSet) {
    let src = new_charge.as_dvec3();
    for (cell, p) in candidates.iter_mut() {
        if let Some(k) = kernel(cell.as_dvec3(), src) {
            *p += k;
        }
    }
}

/// Sampling weights derived from candidate potentials.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthWeights {
    /// Unnormalised `U^u` per candidate.
    pub weights: Vec<f64>,
    /// `weights[i] / total`; all zero when `total` is zero.
    pub probabilities: Vec<f64>,
    pub total: f64,
}

/// Dielectric breakdown growth weights.
///
/// Potentials are rescaled to `[0, 1]` with `(O - Omin) / (Omax - Omin)`,
/// raised to `bias_exponent` and normalised. A perfectly flat field is
/// widened by [`FLAT_FIELD_EPSILON`] on both sides so every site lands on
/// `0.5` instead of dividing by zero.
pub fn growth_probabilities(potentials: &[f64], bias_exponent: f64) -> GrowthWeights {
    let mut lo = potentials.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = potentials.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= FLAT_FIELD_EPSILON;
        hi += FLAT_FIELD_EPSILON;
    }
    let span = hi - lo;

    let weights: Vec<f64> = potentials
        .iter()
        .map(|&o| ((o - lo) / span).powf(bias_exponent))
        .collect();
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();

    let probabilities = if total > 0.0 {
        weights.iter().map(|w| w.max(0.0) / total).collect()
    } else {
        vec![0.0; weights.len()]
    };

    GrowthWeights {
        weights,
        probabilities,
        total,
    }
}
