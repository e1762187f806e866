use crate::{
    charges::{AttractorSet, GroundPlane, PointCharge},
    error::ConfigError,
    stencil,
    types::Cell,
};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything a growth run needs, fixed for the lifetime of the run.
///
/// The engine takes its own copy at construction; changing a `Config`
/// afterwards has no effect on a running simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed charges. The first one is the root of the grown tree; every later
    /// one must touch an earlier one.
    pub origins: Vec<Cell>,
    pub max_steps: usize,
    /// World size of one lattice cell. Only used when mapping cells out.
    pub grid_scale: f64,
    /// Dielectric breakdown exponent `u`. `1.0` grows proportionally to the
    /// normalised potential; larger values favour the strongest sites.
    pub bias_exponent: f64,
    /// Number of secondary channel levels pulled out after the main channel.
    pub h_order_count: usize,
    pub seed: u64,
    pub ground: GroundPlane,
    pub attractors: AttractorSet,
    pub insulators: HashSet<Cell>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origins: vec![IVec3::ZERO],
            max_steps: 500,
            grid_scale: 1.0,
            bias_exponent: 2.0,
            h_order_count: 1,
            seed: 0,
            ground: GroundPlane::default(),
            attractors: AttractorSet::default(),
            insulators: HashSet::new(),
        }
    }
}

impl Config {
    /// Checks that every requested input can be resolved.
    ///
    /// Origins are checked in order with the same adjacency rule the tree
    /// builder uses, so a valid origin list always yields a connected tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origins.is_empty() {
            return Err(ConfigError::NoOrigins);
        }

        let mut seen = HashSet::with_capacity(self.origins.len());
        for (i, &cell) in self.origins.iter().enumerate() {
            if self.insulators.contains(&cell) {
                return Err(ConfigError::InsulatedOrigin { cell });
            }
            if seen.contains(&cell) {
                return Err(ConfigError::DuplicateOrigin { cell });
            }
            if i > 0 && !stencil::neighbors(cell).iter().any(|n| seen.contains(n)) {
                return Err(ConfigError::DisconnectedOrigin { index: i, cell });
            }
            seen.insert(cell);
        }

        if !self.bias_exponent.is_finite() || self.bias_exponent < 0.0 {
            return Err(ConfigError::BiasExponent(self.bias_exponent));
        }
        if !self.grid_scale.is_finite() || self.grid_scale <= 0.0 {
            return Err(ConfigError::GridScale(self.grid_scale));
        }

        let g = &self.ground;
        if g.enabled && !g.charge.is_finite() {
            return Err(ConfigError::Ground {
                z: g.z,
                charge: g.charge,
            });
        }

        if let Some(a) = self.attractors.points.iter().find(|a| !a.charge.is_finite()) {
            return Err(ConfigError::Attractor {
                cell: a.cell,
                charge: a.charge,
            });
        }

        Ok(())
    }

    /// Ground and attractor charges, in that order.
    pub fn external_charges(&self) -> Vec<PointCharge> {
        let mut out = self.ground.point_charges();
        out.extend(self.attractors.point_charges());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_missing_and_duplicate_origins() {
        let mut cfg = Config::default();
        cfg.origins.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoOrigins));

        cfg.origins = vec![IVec3::ZERO, IVec3::X, IVec3::ZERO];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DuplicateOrigin { cell: IVec3::ZERO })
        );
    }

    #[test]
    fn rejects_origin_that_cannot_be_parented() {
        let mut cfg = Config::default();
        cfg.origins = vec![IVec3::ZERO, IVec3::new(1, 1, 1), IVec3::new(5, 0, 0)];
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DisconnectedOrigin {
                index: 2,
                cell: IVec3::new(5, 0, 0)
            })
        );
    }

    #[test]
    fn rejects_insulated_origin() {
        let mut cfg = Config::default();
        cfg.insulators.insert(IVec3::ZERO);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InsulatedOrigin { cell: IVec3::ZERO })
        );
    }

    #[test]
    fn rejects_bad_scalars() {
        let mut cfg = Config::default();
        cfg.bias_exponent = -1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::BiasExponent(-1.0)));

        let mut cfg = Config::default();
        cfg.grid_scale = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::GridScale(0.0)));
    }

    #[test]
    fn rejects_non_finite_ground_and_attractor_charges() {
        let mut cfg = Config::default();
        cfg.ground = GroundPlane::at(-5, f64::NAN);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Ground { z: -5, .. })
        ));

        // A disabled plane is never looked at.
        cfg.ground.enabled = false;
        assert_eq!(cfg.validate(), Ok(()));

        let mut cfg = Config::default();
        cfg.attractors = AttractorSet::uniform([IVec3::new(0, 0, 9)], f64::INFINITY);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Attractor { .. })
        ));
    }

    #[test]
    fn accepts_ground_plane_at_zero() {
        let mut cfg = Config::default();
        cfg.origins = vec![IVec3::new(0, 0, 10)];
        cfg.ground = GroundPlane::at(0, -250.0);
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.external_charges().len(), 5);
    }

    #[test]
    fn external_charges_list_ground_then_attractors() {
        let mut cfg = Config::default();
        cfg.ground = GroundPlane::at(-4, 1.0);
        cfg.attractors = AttractorSet::uniform([IVec3::new(0, 0, 9)], 2.0);

        let charges = cfg.external_charges();
        assert_eq!(charges.len(), 6);
        assert_eq!(charges[5].charge, 2.0);
    }
}
