//! Poisson Monte Carlo Core Library
//!
//! Computes a divergence-free correction `Φ` to the gradient of a periodic
//! Poisson potential that minimizes the worst-case magnitude `||∇u + Φ||∞`.
//!
//! ## Pipeline
//!
//! - Spectral (FFT) solve of `∇²u = f` for a point source on an N×N torus
//! - Forward-difference gradient `(ux, uy)` of the potential
//! - Best-tracking Metropolis-Hastings walk over `Φ` using divergence-free
//!   plaquette moves
//! - CSV output of the potential, gradient, best correction, corrected field
//!   and energy trace, plus trace statistics against the uncorrected baseline

// Field storage
pub mod grid;

// Deterministic solvers (Poisson, gradient)
pub mod solver;

// Stochastic minimization
pub mod sampler;

// Driver, configuration and output
pub mod simulation;

mod error;

pub use error::SimError;
pub use grid::{PeriodicGrid, SimulationState, VectorField};
pub use sampler::{
    corrected_field, max_norm, EnergyTracker, MetropolisSampler, Plaquette, RandomSource,
    SamplerParams, SamplerStats, SeededSource, StepOutcome,
};
pub use simulation::{
    Experiment, Histogram, PointSource, ProgressObserver, ProgressReport, RunConfig, RunSummary,
    SilentProgress, TraceStats, TracingProgress,
};
pub use solver::{forward_gradient, SpectralPoissonSolver};
