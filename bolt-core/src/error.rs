use crate::types::{Cell, CellIndex};
use thiserror::Error;

/// Problems with the inputs, caught before any growth happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no origin cells supplied")]
    NoOrigins,

    #[error("origin cell {cell} is listed twice")]
    DuplicateOrigin { cell: Cell },

    #[error("origin cell {cell} lies inside the insulator set")]
    InsulatedOrigin { cell: Cell },

    #[error("origin cell {cell} (origin #{index}) does not touch any earlier origin")]
    DisconnectedOrigin { index: usize, cell: Cell },

    #[error("bias exponent must be finite and non-negative, got {0}")]
    BiasExponent(f64),

    #[error("grid scale must be finite and positive, got {0}")]
    GridScale(f64),

    #[error("ground plane at z = {z} with charge {charge} cannot be resolved")]
    Ground { z: i32, charge: f64 },

    #[error("attractor at {cell} has non-finite charge {charge}")]
    Attractor { cell: Cell, charge: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoltError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("step {step}: {candidates} candidate sites but no positive growth weight")]
    DegenerateSampling { step: usize, candidates: usize },

    #[error("candidate {cell} is already part of the charge grid")]
    ChargedCandidate { cell: Cell },

    #[error("cell #{index} at {cell} has no earlier neighbour to attach to")]
    GraphIntegrity { index: CellIndex, cell: Cell },
}

pub type Result<T> = std::result::Result<T, BoltError>;
