//! Deterministic field solvers
//!
//! The base field of the experiment is computed once up front: the spectral
//! Poisson solve produces the potential `u`, and the forward-difference
//! operator turns it into the gradient `(ux, uy)` the sampler corrects.

mod gradient;
mod poisson;

pub use gradient::forward_gradient;
pub use poisson::{laplacian_symbol, signed_frequency, SpectralPoissonSolver};
