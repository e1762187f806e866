//! Dielectric breakdown ("Laplacian lightning") growth on a 3-D lattice.
//!
//! Main components:
//! - [`stencil`]: 26-connected lattice neighbourhood.
//! - [`candidates`]: growth candidate sites around the charge set.
//! - [`potential`]: potential field and growth probabilities.
//! - [`phases`] / [`growth`]: the seeded, step-wise growth engine.
//! - [`tree`]: child/parent tree over the grown cells.
//! - [`paths`] / [`classify`]: main, secondary and tip channel extraction.
//! - [`pipeline`]: one-call grow + classify.
//! - [`charges`], [`config`], [`error`], [`grid`], [`types`]: inputs,
//!   errors and shared types.

pub mod candidates;
pub mod charges;
pub mod classify;
pub mod config;
pub mod error;
pub mod grid;
pub mod growth;
pub mod paths;
pub mod phases;
pub mod pipeline;
pub mod potential;
pub mod stencil;
pub mod tree;
pub mod types;

pub use config::Config;
pub use error::{BoltError, ConfigError};
pub use pipeline::{Bolt, simulate, simulate_with_rng};
