//! Stochastic minimization of the max-norm energy
//!
//! The sampler walks the correction field `(phi_x, phi_y)` with
//! divergence-free plaquette moves and keeps the best field it has seen.
//!
//! # Components
//!
//! - [`energy`]: the max-norm objective and its incremental tracker
//! - [`plaquette`]: the four-point move and its exact undo
//! - [`random`]: the injectable random source
//! - [`metropolis`]: the best-tracking acceptance rule

pub mod energy;
pub mod metropolis;
pub mod plaquette;
pub mod random;

pub use energy::{cell_magnitude, corrected_field, max_norm, EnergyTracker};
pub use metropolis::{
    acceptance_probability, MetropolisSampler, SamplerParams, SamplerStats, StepOutcome,
};
pub use plaquette::{AppliedPlaquette, Component, Increment, Plaquette};
pub use random::{seed_from_clock, RandomSource, SeededSource};
