//! Headless driver: owns the configuration and the last generated bolt.

use bolt_core::{Bolt, BoltError, Config, phases::StopReason, simulate, types::CellIndex};
use log::info;
use serde::Serialize;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Bolt(#[from] BoltError),

    #[error("nothing has been generated yet")]
    NothingGenerated,
}

/// Reads a [`Config`] from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<Config, RunError> {
    let text = fs::read_to_string(path)?;
    let cfg: Config = serde_json::from_str(&text)?;
    info!("loaded config from {}", path.display());
    Ok(cfg)
}

/// JSON view of a [`Bolt`].
#[derive(Debug, Serialize)]
pub struct BoltOutput<'a> {
    pub stop: StopReason,
    pub steps: usize,
    pub grid_scale: f64,
    pub charge_grid: Vec<[i32; 3]>,
    pub main_path: &'a [CellIndex],
    pub h_order_paths: &'a [Vec<Vec<CellIndex>>],
    pub tip_paths: &'a [Vec<CellIndex>],
}

impl<'a> From<&'a Bolt> for BoltOutput<'a> {
    fn from(bolt: &'a Bolt) -> Self {
        Self {
            stop: bolt.report.stop,
            steps: bolt.report.steps,
            grid_scale: bolt.grid_scale,
            charge_grid: bolt.grid.cells().iter().map(|c| c.to_array()).collect(),
            main_path: &bolt.paths.main_path,
            h_order_paths: &bolt.paths.h_order_paths,
            tip_paths: &bolt.paths.tip_paths,
        }
    }
}

pub struct Runner {
    cfg: Config,
    last: Option<Bolt>,
}

impl Runner {
    pub fn new(cfg: Config) -> Self {
        Self { cfg, last: None }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn last(&self) -> Option<&Bolt> {
        self.last.as_ref()
    }

    /// Generates a bolt with the current configuration and keeps it.
    pub fn run_once(&mut self) -> Result<&Bolt, RunError> {
        let bolt = simulate(&self.cfg)?;
        info!(
            "{} cells in {} steps ({:?}), {} secondary channels, {} tips",
            bolt.grid.len(),
            bolt.report.steps,
            bolt.report.stop,
            bolt.paths.h_order_count(),
            bolt.paths.tip_paths.len()
        );
        Ok(self.last.insert(bolt))
    }

    /// Replaces the configuration and drops the last result.
    pub fn reset(&mut self, cfg: Config) {
        self.cfg = cfg;
        self.last = None;
    }

    /// Pretty JSON of the last result.
    pub fn to_json(&self) -> Result<String, RunError> {
        let bolt = self.last.as_ref().ok_or(RunError::NothingGenerated)?;
        Ok(serde_json::to_string_pretty(&BoltOutput::from(bolt))?)
    }
}
