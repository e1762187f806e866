//! Step-wise dielectric breakdown growth.

use crate::{
    candidates::{CandidateSet, candidates_for},
    charges::PointCharge,
    config::Config,
    error::{BoltError, Result},
    grid::ChargeGrid,
    phases::{self, StopReason},
    potential::initial_potentials,
    types::{Cell, CellIndex},
};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Origins are placed but the candidate frontier has not been built.
    Initializing,
    Stepping,
    Terminated(StopReason),
}

/// Summary of a finished (or aborted) run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthReport {
    pub steps: usize,
    pub stop: StopReason,
    pub cells: usize,
    pub candidates_left: usize,
}

/// Grows one cell per [`GrowthEngine::step`] until a stop condition hits.
///
/// The engine owns its configuration and random source. Every bit of
/// randomness comes from `rng`, so a given seed and config always grow the
/// same structure.
#[derive(Debug)]
pub struct GrowthEngine<R = StdRng> {
    cfg: Config,
    rng: R,
    grid: ChargeGrid,
    candidates: CandidateSet,
    external: Vec<PointCharge>,
    cloud: HashSet<Cell>,
    state: EngineState,
    steps: usize,
}

impl GrowthEngine<StdRng> {
    /// Engine drawing from `StdRng` seeded with `cfg.seed`.
    pub fn seeded(cfg: Config) -> Result<Self> {
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self::new(cfg, rng)
    }
}

impl<R: Rng> GrowthEngine<R> {
    /// Validates `cfg` and places the origin charges.
    pub fn new(cfg: Config, rng: R) -> Result<Self> {
        cfg.validate()?;

        let grid = ChargeGrid::from_cells(cfg.origins.iter().copied());
        let external = cfg.external_charges();
        let cloud = cfg.attractors.cell_set();

        Ok(Self {
            cfg,
            rng,
            grid,
            candidates: CandidateSet::new(),
            external,
            cloud,
            state: EngineState::Initializing,
            steps: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn grid(&self) -> &ChargeGrid {
        &self.grid
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Ground and attractor charges in effect for this run.
    pub fn external_charges(&self) -> &[PointCharge] {
        &self.external
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, EngineState::Terminated(_))
    }

    /// Builds the candidate frontier around the origins.
    fn initialize(&mut self) {
        let cells = candidates_for(self.grid.cells(), &self.cfg.insulators);

        let mut charges: Vec<PointCharge> = self
            .grid
            .cells()
            .iter()
            .map(|&c| PointCharge::at_cell(c, 1.0))
            .collect();
        charges.extend_from_slice(&self.external);

        for (cell, p) in cells.iter().zip(initial_potentials(&charges, &cells)) {
            self.candidates.insert(*cell, p);
        }

        self.state = if self.candidates.is_empty() {
            EngineState::Terminated(StopReason::Exhausted)
        } else if self.cfg.max_steps == 0 {
            EngineState::Terminated(StopReason::StepBudget)
        } else {
            EngineState::Stepping
        };
        debug!(
            "initialized: {} origins, {} candidates",
            self.grid.len(),
            self.candidates.len()
        );
        if let EngineState::Terminated(stop) = self.state {
            info!("growth stopped before the first step: {stop:?}");
        }
    }

    /// Advances the simulation by one cell.
    ///
    /// The first call also builds the candidate frontier.
    ///
    /// ### Returns
    /// - `Ok(Some(index))` with the grid index of the grown cell.
    /// - `Ok(None)` if the engine is (or just became) terminated without
    ///   growing.
    /// - `Err(BoltError::DegenerateSampling)` if candidates exist but none
    ///   can be drawn; the engine is terminated afterwards.
    /// - `Err(BoltError::ChargedCandidate)` if the drawn site is already in
    ///   the grid; the engine is terminated afterwards.
    pub fn step(&mut self) -> Result<Option<CellIndex>> {
        if self.state == EngineState::Initializing {
            self.initialize();
        }
        if self.is_terminated() {
            return Ok(None);
        }

        let Some(cell) =
            phases::selection_phase(&self.candidates, self.cfg.bias_exponent, &mut self.rng)
        else {
            warn!(
                "step {}: no positive weight among {} candidates",
                self.steps,
                self.candidates.len()
            );
            self.state = EngineState::Terminated(StopReason::DegenerateSampling);
            return Err(BoltError::DegenerateSampling {
                step: self.steps,
                candidates: self.candidates.len(),
            });
        };

        let Some(index) = phases::commit_phase(&mut self.grid, &mut self.candidates, cell) else {
            self.state = EngineState::Terminated(StopReason::DegenerateSampling);
            return Err(BoltError::ChargedCandidate { cell });
        };
        let added = phases::expansion_phase(
            &self.grid,
            &mut self.candidates,
            &self.cfg.insulators,
            &self.external,
            cell,
        );
        self.steps += 1;
        debug!(
            "step {}: grew {cell} as #{index}, +{added} candidates ({} total)",
            self.steps,
            self.candidates.len()
        );

        let stop = phases::strike_phase(&self.cfg.ground, &self.cloud, cell).or_else(|| {
            if self.steps >= self.cfg.max_steps {
                Some(StopReason::StepBudget)
            } else if self.candidates.is_empty() {
                Some(StopReason::Exhausted)
            } else {
                None
            }
        });
        if let Some(stop) = stop {
            info!(
                "growth stopped after {} steps with {} cells: {stop:?}",
                self.steps,
                self.grid.len()
            );
            self.state = EngineState::Terminated(stop);
        }

        Ok(Some(index))
    }

    /// Steps until the engine terminates.
    pub fn run(&mut self) -> Result<GrowthReport> {
        loop {
            if let Some(report) = self.report() {
                return Ok(report);
            }
            self.step()?;
        }
    }

    /// Run summary, available once the engine has terminated.
    pub fn report(&self) -> Option<GrowthReport> {
        let EngineState::Terminated(stop) = self.state else {
            return None;
        };
        Some(GrowthReport {
            steps: self.steps,
            stop,
            cells: self.grid.len(),
            candidates_left: self.candidates.len(),
        })
    }

    /// Consumes the engine, keeping the grown cells.
    pub fn into_grid(self) -> ChargeGrid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        charges::{AttractorSet, GroundPlane},
        error::ConfigError,
        potential::potential_at,
        stencil,
    };
    use glam::IVec3;

    fn cfg(max_steps: usize, seed: u64) -> Config {
        Config {
            max_steps,
            seed,
            bias_exponent: 1.0,
            ..Config::default()
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut c = cfg(5, 0);
        c.origins.clear();
        let err = GrowthEngine::seeded(c).unwrap_err();
        assert_eq!(err, BoltError::Config(ConfigError::NoOrigins));
    }

    #[test]
    fn engine_starts_initializing_then_steps() {
        let mut engine = GrowthEngine::seeded(cfg(3, 1)).unwrap();
        assert_eq!(engine.state(), EngineState::Initializing);
        assert_eq!(engine.report(), None);
        assert!(engine.candidates().is_empty());

        let idx = engine.step().unwrap();
        assert_eq!(idx, Some(1));
        assert_eq!(engine.state(), EngineState::Stepping);
        assert_eq!(engine.grid().len(), 2);
    }

    #[test]
    fn run_respects_step_budget() {
        let mut engine = GrowthEngine::seeded(cfg(5, 42)).unwrap();
        let report = engine.run().unwrap();

        assert_eq!(report.steps, 5);
        assert_eq!(report.cells, 6);
        assert_eq!(report.stop, StopReason::StepBudget);
        assert_eq!(engine.step().unwrap(), None, "terminated engines do not grow");
        assert_eq!(engine.grid().len(), 6);
    }

    #[test]
    fn zero_budget_grows_nothing() {
        let mut engine = GrowthEngine::seeded(cfg(0, 0)).unwrap();
        let report = engine.run().unwrap();
        assert_eq!(report.steps, 0);
        assert_eq!(report.stop, StopReason::StepBudget);
        assert_eq!(report.cells, 1);
    }

    #[test]
    fn every_grown_cell_touches_an_earlier_one() {
        let mut engine = GrowthEngine::seeded(cfg(40, 9)).unwrap();
        engine.run().unwrap();

        let cells = engine.grid().cells();
        for (i, &c) in cells.iter().enumerate().skip(1) {
            assert!(
                cells[..i].iter().any(|&p| stencil::is_adjacent(p, c)),
                "cell #{i} {c} is detached"
            );
        }
    }

    #[test]
    fn candidate_potentials_match_recomputation_after_each_step() {
        let mut c = cfg(15, 5);
        c.ground = GroundPlane::at(-12, 1.0);
        c.attractors = AttractorSet::uniform([IVec3::new(3, 0, 9)], -2.0);
        let mut engine = GrowthEngine::seeded(c).unwrap();

        while !engine.is_terminated() {
            engine.step().unwrap();

            let mut charges: Vec<PointCharge> = engine
                .grid()
                .cells()
                .iter()
                .map(|&c| PointCharge::at_cell(c, 1.0))
                .collect();
            charges.extend_from_slice(engine.external_charges());

            for (cell, p) in engine.candidates().iter() {
                let fresh = potential_at(cell, &charges);
                assert!((p - fresh).abs() < 1e-9, "{cell}: {p} vs {fresh}");
            }
        }
    }

    #[test]
    fn candidates_stay_disjoint_from_grid_and_insulators() {
        let mut c = cfg(30, 2);
        c.insulators = [IVec3::new(0, 0, -1), IVec3::new(1, 0, -1)]
            .into_iter()
            .collect();
        let insulators = c.insulators.clone();
        let mut engine = GrowthEngine::seeded(c).unwrap();
        engine.run().unwrap();

        for &cell in engine.candidates().cells() {
            assert!(!engine.grid().contains(&cell));
            assert!(!insulators.contains(&cell));
        }
        for cell in &insulators {
            assert!(!engine.grid().contains(cell));
        }
    }

    #[test]
    fn growth_stops_on_attractor() {
        let mut c = cfg(500, 8);
        // Wide sheet of attracting (negative) charges three cells up.
        let cloud: Vec<IVec3> = (-12..=12)
            .flat_map(|x| (-12..=12).map(move |y| IVec3::new(x, y, 3)))
            .collect();
        c.attractors = AttractorSet::uniform(cloud, -1.0);
        let mut engine = GrowthEngine::seeded(c).unwrap();
        let report = engine.run().unwrap();

        assert_eq!(report.stop, StopReason::CloudStrike);
        let last = engine.grid().cells()[report.cells - 1];
        assert_eq!(last.z, 3);
    }

    #[test]
    fn injected_rng_is_used() {
        let a = {
            let mut e = GrowthEngine::new(cfg(20, 0), StdRng::seed_from_u64(77)).unwrap();
            e.run().unwrap();
            e.into_grid()
        };
        let b = {
            let mut e = GrowthEngine::new(cfg(20, 12345), StdRng::seed_from_u64(77)).unwrap();
            e.run().unwrap();
            e.into_grid()
        };
        assert_eq!(a, b, "config seed must not matter when an rng is injected");
    }
}
