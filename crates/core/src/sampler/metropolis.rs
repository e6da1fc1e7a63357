//! Best-tracking Metropolis-Hastings sampler
//!
//! One iteration:
//!
//! 1. Draw a row, a column, then a Gaussian magnitude `δ ~ N(0, σ²)`
//! 2. Note the energy `E_old` before the move, apply the plaquette, and
//!    evaluate the energy `E` after it
//! 3. If `E` beats the best energy seen so far, keep the move and snapshot the
//!    correction field as the new best
//! 4. Otherwise draw `r ~ U[0, 1)` and revert the move when
//!    `r > exp(-β (E - E_old) / 2)`
//!
//! The thermal test only runs when the move fails to beat the global best,
//! and it compares against the pre-move energy rather than the best. A move
//! that merely ties the best goes through the thermal test.
//!
//! Draw order per iteration is fixed (index, index, Gaussian, then one uniform
//! on the thermal branch only), so a seeded source replays the same run.

use super::energy::EnergyTracker;
use super::plaquette::Plaquette;
use super::random::RandomSource;
use crate::grid::SimulationState;
use serde::{Deserialize, Serialize};

/// Fixed sampler parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerParams {
    /// Standard deviation of the Gaussian move magnitude
    pub step_std_dev: f64,
    /// Inverse temperature of the thermal acceptance test
    pub beta: f64,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            step_std_dev: 1e-7,
            beta: 1000.0,
        }
    }
}

/// Resolution of one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Move kept and recorded as the new best
    NewBest,
    /// Move kept by the thermal test
    Accepted,
    /// Move reverted by the thermal test
    Rejected,
}

/// Running counts of step outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerStats {
    pub new_best: u64,
    pub accepted: u64,
    pub rejected: u64,
}

impl SamplerStats {
    /// Total iterations counted
    #[must_use]
    pub fn total(&self) -> u64 {
        self.new_best + self.accepted + self.rejected
    }

    /// Fraction of moves kept (new best or thermally accepted)
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.new_best + self.accepted) as f64 / total as f64
        }
    }

    fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::NewBest => self.new_best += 1,
            StepOutcome::Accepted => self.accepted += 1,
            StepOutcome::Rejected => self.rejected += 1,
        }
    }
}

/// Probability of keeping a move that raised the energy by `delta_energy`
///
/// `exp(-β ΔE / 2)`; values above 1 (energy went down) always keep the move.
#[must_use]
pub fn acceptance_probability(beta: f64, delta_energy: f64) -> f64 {
    (-beta * delta_energy / 2.0).exp()
}

/// Single-chain sampler over the correction field of a [`SimulationState`]
#[derive(Debug, Clone)]
pub struct MetropolisSampler {
    params: SamplerParams,
    tracker: EnergyTracker,
    stats: SamplerStats,
}

impl MetropolisSampler {
    /// Create a sampler synchronized with the current fields of `state`
    #[must_use]
    pub fn new(params: SamplerParams, state: &SimulationState) -> Self {
        Self {
            params,
            tracker: EnergyTracker::new(state.gradient(), state.correction()),
            stats: SamplerStats::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> SamplerParams {
        self.params
    }

    /// Energy of the current correction field
    #[must_use]
    pub fn current_energy(&self) -> f64 {
        self.tracker.value()
    }

    #[must_use]
    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Run one propose / evaluate / accept-or-revert iteration
    pub fn step<R>(
        &mut self,
        iteration: u64,
        state: &mut SimulationState,
        rng: &mut R,
    ) -> StepOutcome
    where
        R: RandomSource + ?Sized,
    {
        let n = state.size();
        let row = rng.uniform_index(n);
        let col = rng.uniform_index(n);
        let energy_before = self.tracker.value();
        let delta = rng.gaussian(self.params.step_std_dev);

        let plaquette = Plaquette::new(row, col, delta);
        let touched = plaquette.touched_cells(n);
        let applied = plaquette.apply(&mut state.correction);
        self.tracker.refresh(state.gradient(), &state.correction, &touched);
        let energy = self.tracker.value();

        let outcome = if energy < state.best_energy {
            state.record_best(energy, iteration);
            StepOutcome::NewBest
        } else {
            let threshold = acceptance_probability(self.params.beta, energy - energy_before);
            if rng.uniform_unit() > threshold {
                applied.revert(&mut state.correction);
                self.tracker.refresh(state.gradient(), &state.correction, &touched);
                StepOutcome::Rejected
            } else {
                StepOutcome::Accepted
            }
        };

        self.stats.record(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{PeriodicGrid, VectorField};
    use crate::sampler::energy::max_norm;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedSource {
        indices: VecDeque<usize>,
        gaussians: VecDeque<f64>,
        uniforms: VecDeque<f64>,
    }

    impl RandomSource for ScriptedSource {
        fn uniform_index(&mut self, upper: usize) -> usize {
            let value = self.indices.pop_front().expect("index draw not scripted");
            assert!(value < upper);
            value
        }

        fn uniform_unit(&mut self) -> f64 {
            self.uniforms.pop_front().expect("uniform draw not scripted")
        }

        fn gaussian(&mut self, _std_dev: f64) -> f64 {
            self.gaussians.pop_front().expect("gaussian draw not scripted")
        }
    }

    impl ScriptedSource {
        fn exhausted(&self) -> bool {
            self.uniforms.is_empty() && self.indices.is_empty() && self.gaussians.is_empty()
        }
    }

    fn tilted_state(n: usize) -> SimulationState {
        let mut gradient = VectorField::zeros(n);
        gradient.x[(0, 0)] = 1.0;
        SimulationState::from_parts(PeriodicGrid::new(n), PeriodicGrid::new(n), gradient, 0)
    }

    #[test]
    fn test_first_move_is_new_best() {
        let mut state = tilted_state(2);
        let mut sampler = MetropolisSampler::new(SamplerParams::default(), &state);
        assert_eq!(sampler.current_energy(), 1.0);

        let mut rng = ScriptedSource {
            indices: VecDeque::from(vec![0, 0]),
            gaussians: VecDeque::from(vec![-0.5]),
            ..ScriptedSource::default()
        };
        let outcome = sampler.step(0, &mut state, &mut rng);

        assert_eq!(outcome, StepOutcome::NewBest);
        assert_eq!(state.best_iter(), Some(0));
        assert_eq!(state.best_energy(), 0.5_f64.sqrt());
        assert_eq!(state.best_correction(), state.correction());
        // No uniform was needed on the best branch
        assert!(rng.exhausted());
    }

    #[test]
    fn test_rejection_reverts_exactly() {
        let mut state = tilted_state(3);
        let params = SamplerParams {
            step_std_dev: 1.0,
            beta: 1.0e6,
        };
        let mut sampler = MetropolisSampler::new(params, &state);
        assert_eq!(sampler.params(), params);

        // Step 0 improves on +inf; step 1 pushes cell (0, 0) further out
        let mut rng = ScriptedSource {
            indices: VecDeque::from(vec![0, 0, 0, 0]),
            gaussians: VecDeque::from(vec![-0.1, 0.5]),
            uniforms: VecDeque::from(vec![0.5]),
        };
        assert_eq!(sampler.step(0, &mut state, &mut rng), StepOutcome::NewBest);
        let before = state.correction().clone();
        let energy_before = sampler.current_energy();

        assert_eq!(sampler.step(1, &mut state, &mut rng), StepOutcome::Rejected);
        assert_eq!(state.correction(), &before);
        assert_eq!(sampler.current_energy(), energy_before);
        assert_eq!(state.best_iter(), Some(0));
        assert_eq!(sampler.stats().rejected, 1);
    }

    #[test]
    fn test_zero_energy_change_is_always_kept() {
        assert_eq!(acceptance_probability(1000.0, 0.0), 1.0);
        assert!(acceptance_probability(1000.0, -1.0) > 1.0);
        assert!(acceptance_probability(1000.0, 1.0) < 1e-200);
    }

    #[test]
    fn test_tracker_stays_in_sync() {
        let n = 4;
        let mut gradient = VectorField::zeros(n);
        gradient.x[(1, 1)] = 0.8;
        gradient.y[(2, 3)] = -0.6;
        gradient.x[(3, 0)] = 0.3;
        let mut state =
            SimulationState::from_parts(PeriodicGrid::new(n), PeriodicGrid::new(n), gradient, 0);
        let params = SamplerParams {
            step_std_dev: 0.05,
            beta: 50.0,
        };
        let mut sampler = MetropolisSampler::new(params, &state);
        let mut rng = crate::sampler::SeededSource::new(11);

        for iteration in 0..2_000 {
            sampler.step(iteration, &mut state, &mut rng);
            assert_eq!(
                sampler.current_energy(),
                max_norm(state.gradient(), state.correction()),
                "iteration {iteration}"
            );
        }
        assert_eq!(sampler.stats().total(), 2_000);
    }

    #[test]
    fn test_stats_acceptance_rate() {
        let stats = SamplerStats {
            new_best: 1,
            accepted: 2,
            rejected: 1,
        };
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.acceptance_rate(), 0.75);
        assert_eq!(SamplerStats::default().acceptance_rate(), 0.0);
    }
}
