//! End-to-end run: grow, build the tree, classify.

use crate::{
    classify::{ClassifiedPaths, classify},
    config::Config,
    error::Result,
    grid::ChargeGrid,
    growth::{GrowthEngine, GrowthReport},
    tree::ChildParentGraph,
};
use glam::DVec3;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// A grown and classified discharge.
#[derive(Debug, Clone)]
pub struct Bolt {
    pub grid: ChargeGrid,
    pub report: GrowthReport,
    pub graph: ChildParentGraph,
    pub paths: ClassifiedPaths,
    pub grid_scale: f64,
}

impl Bolt {
    /// Cell centres in world space.
    pub fn world_positions(&self) -> Vec<DVec3> {
        self.grid.world_positions(self.grid_scale)
    }
}

/// Runs the whole pipeline with `StdRng` seeded from `cfg.seed`.
pub fn simulate(cfg: &Config) -> Result<Bolt> {
    simulate_with_rng(cfg, StdRng::seed_from_u64(cfg.seed))
}

/// Runs the whole pipeline drawing from `rng`.
pub fn simulate_with_rng<R: Rng>(cfg: &Config, rng: R) -> Result<Bolt> {
    let mut engine = GrowthEngine::new(cfg.clone(), rng)?;
    let report = engine.run()?;
    let grid = engine.into_grid();

    let graph = ChildParentGraph::build(grid.cells())?;
    let paths = classify(&graph, cfg.h_order_count);

    Ok(Bolt {
        grid,
        report,
        graph,
        paths,
        grid_scale: cfg.grid_scale,
    })
}
