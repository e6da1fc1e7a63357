//! Simulation state
//!
//! Owns every field of one experiment: the source density, the solved
//! potential and its gradient (all write-once), the mutable correction field,
//! the best correction found so far, and the sampled energy trace.

use super::periodic::{PeriodicGrid, VectorField};
use crate::solver::{forward_gradient, SpectralPoissonSolver};
use tracing::debug;

/// All grids and scalar state for one run
///
/// The source, potential and base gradient are fixed at construction and only
/// exposed by shared reference. The sampler mutates the correction field and
/// the best-so-far record through crate-internal access.
#[derive(Debug, Clone)]
pub struct SimulationState {
    source: PeriodicGrid,
    potential: PeriodicGrid,
    gradient: VectorField,
    pub(crate) correction: VectorField,
    pub(crate) best_correction: VectorField,
    pub(crate) best_energy: f64,
    pub(crate) best_iter: Option<u64>,
    energies: Vec<f64>,
    max_samples: usize,
}

impl SimulationState {
    /// Solve the periodic Poisson equation for `source` and build the state
    ///
    /// Runs the spectral solve and the forward-difference gradient once. The
    /// correction fields start at zero, the best energy at `+∞` and the best
    /// iteration unset.
    ///
    /// # Arguments
    ///
    /// * `source` - Right-hand side `f` of `∇²u = f`
    /// * `max_samples` - Capacity of the energy trace
    #[must_use]
    pub fn solve(source: PeriodicGrid, max_samples: usize) -> Self {
        let solver = SpectralPoissonSolver::new(source.size());
        let potential = solver.solve(&source);
        let gradient = forward_gradient(&potential);
        debug!(
            "Base gradient ready: max |∇u| component {:.6e}",
            gradient.x.max_abs().max(gradient.y.max_abs())
        );
        Self::from_parts(source, potential, gradient, max_samples)
    }

    /// Build a state from precomputed source, potential and gradient
    ///
    /// Useful when the base field is known analytically.
    ///
    /// # Panics
    ///
    /// Panics if the three inputs differ in size
    #[must_use]
    pub fn from_parts(
        source: PeriodicGrid,
        potential: PeriodicGrid,
        gradient: VectorField,
        max_samples: usize,
    ) -> Self {
        let size = source.size();
        assert!(
            potential.size() == size && gradient.size() == size,
            "Field sizes do not match"
        );
        Self {
            source,
            potential,
            gradient,
            correction: VectorField::zeros(size),
            best_correction: VectorField::zeros(size),
            best_energy: f64::INFINITY,
            best_iter: None,
            energies: Vec::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Grid size N
    #[must_use]
    pub fn size(&self) -> usize {
        self.source.size()
    }

    /// Source density `f`
    #[must_use]
    pub fn source(&self) -> &PeriodicGrid {
        &self.source
    }

    /// Potential `u`
    #[must_use]
    pub fn potential(&self) -> &PeriodicGrid {
        &self.potential
    }

    /// Base gradient `(ux, uy)`
    #[must_use]
    pub fn gradient(&self) -> &VectorField {
        &self.gradient
    }

    /// Current correction field `(phi_x, phi_y)`
    #[must_use]
    pub fn correction(&self) -> &VectorField {
        &self.correction
    }

    /// Correction field at the best iteration
    #[must_use]
    pub fn best_correction(&self) -> &VectorField {
        &self.best_correction
    }

    /// Lowest energy recorded so far (`+∞` before any record)
    #[must_use]
    pub fn best_energy(&self) -> f64 {
        self.best_energy
    }

    /// Iteration at which the best energy was recorded
    #[must_use]
    pub fn best_iter(&self) -> Option<u64> {
        self.best_iter
    }

    /// Sampled energy trace in recording order
    #[must_use]
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Maximum number of energy samples kept
    #[must_use]
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Record a new best: energy, iteration, and a deep copy of the correction
    pub(crate) fn record_best(&mut self, energy: f64, iteration: u64) {
        self.best_energy = energy;
        self.best_iter = Some(iteration);
        self.best_correction.copy_from(&self.correction);
    }

    /// Use `energy` as the best when nothing has been recorded yet
    ///
    /// The best correction is still the zero field at that point, so the
    /// initial state is the best known one. The best iteration stays unset.
    pub(crate) fn adopt_initial_best(&mut self, energy: f64) {
        if self.best_iter.is_none() && energy < self.best_energy {
            self.best_energy = energy;
        }
    }

    /// Append an energy sample unless the trace is full
    ///
    /// Returns `true` if the sample was stored.
    pub(crate) fn push_energy(&mut self, energy: f64) -> bool {
        if self.energies.len() < self.max_samples {
            self.energies.push(energy);
            true
        } else {
            false
        }
    }
}
