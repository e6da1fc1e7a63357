//! Experiment driver
//!
//! [`Experiment`] ties the pieces together:
//!
//! 1. validate the [`RunConfig`] and resolve the seed
//! 2. place the point source and solve for the potential and its gradient
//! 3. run the fixed number of sampler iterations, sampling the energy and
//!    reporting progress at their cadences
//! 4. hand every field to [`persistence`] for writing
//!
//! # Example
//!
//! ```rust,no_run
//! use poisson_mc_core::{Experiment, RunConfig};
//!
//! let config = RunConfig { iterations: 1_000_000, seed: Some(7), ..RunConfig::default() };
//! let mut experiment = Experiment::new(config)?;
//! let summary = experiment.run_seeded();
//! experiment.persist(std::path::Path::new("results"), &summary)?;
//! # Ok::<(), poisson_mc_core::SimError>(())
//! ```

mod config;
pub mod persistence;
mod progress;
mod trace;

pub use config::{PointSource, RunConfig};
pub use progress::{ProgressObserver, ProgressReport, SilentProgress, TracingProgress};
pub use trace::{Histogram, TraceStats, HISTOGRAM_BINS};

use crate::error::SimError;
use crate::grid::{PeriodicGrid, SimulationState};
use crate::sampler::{seed_from_clock, MetropolisSampler, RandomSource, SamplerStats, SeededSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Result record of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Configuration the run used (seed resolved)
    pub config: RunConfig,
    /// Seed of the random source
    pub seed: u64,
    /// Iterations executed
    pub iterations: u64,
    /// Energy of the zero correction field
    pub initial_energy: f64,
    /// Energy of the correction field at the end of the run
    pub final_energy: f64,
    /// Lowest energy found; the initial energy while no best is recorded
    pub best_energy: f64,
    /// Iteration of the best energy, `-1` if no move ever improved on it
    pub best_iter: i64,
    /// Number of energy samples recorded
    pub samples: usize,
    /// Outcome counts
    pub stats: SamplerStats,
    /// Statistics of the energy trace against `initial_energy`, `None` when
    /// no sample was taken
    pub trace: Option<TraceStats>,
}

/// One configured experiment and its state
pub struct Experiment {
    config: RunConfig,
    seed: u64,
    state: SimulationState,
    sampler: MetropolisSampler,
    initial_energy: f64,
}

impl Experiment {
    /// Validate `config`, solve the base field and set up the sampler
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration is rejected
    pub fn new(config: RunConfig) -> Result<Self, SimError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(seed_from_clock);
        let config = RunConfig {
            seed: Some(seed),
            ..config
        };

        let n = config.grid_size;
        let source = config.point_source();
        info!(
            "Setting up {}x{} periodic grid, source {:+} at ({}, {}), seed {}",
            n, n, source.strength, source.row, source.col, seed
        );
        let density = PeriodicGrid::from_fn(n, |i, j| {
            if i == source.row && j == source.col {
                source.strength
            } else {
                0.0
            }
        });

        let state = SimulationState::solve(density, config.sample_capacity());
        let sampler = MetropolisSampler::new(config.sampler_params(), &state);
        let initial_energy = sampler.current_energy();
        info!("Initial max-norm ||∇u||∞ = {:.8}", initial_energy);

        Ok(Self {
            config,
            seed,
            state,
            sampler,
            initial_energy,
        })
    }

    /// Configuration with the seed resolved
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn sampler(&self) -> &MetropolisSampler {
        &self.sampler
    }

    /// Random source seeded with this experiment's seed
    #[must_use]
    pub fn random_source(&self) -> SeededSource {
        SeededSource::new(self.seed)
    }

    /// Run with the experiment's own seeded source, logging progress
    pub fn run_seeded(&mut self) -> RunSummary {
        let mut rng = self.random_source();
        self.run(&mut rng, &mut TracingProgress)
    }

    /// Run every configured iteration
    ///
    /// After iteration `it` the current energy is recorded when
    /// `it % sample_interval == 0` (until the trace is full), and a report is
    /// sent to `observer` when `it % progress_interval == 0`.
    pub fn run<R, O>(&mut self, rng: &mut R, observer: &mut O) -> RunSummary
    where
        R: RandomSource + ?Sized,
        O: ProgressObserver + ?Sized,
    {
        let iterations = self.config.iterations;
        let sample_interval = self.config.sample_interval;
        let progress_interval = self.config.progress_interval;
        info!("Running {} Metropolis iterations", iterations);
        let started = Instant::now();

        for iteration in 0..iterations {
            self.sampler.step(iteration, &mut self.state, rng);

            if iteration % sample_interval == 0 {
                self.state.push_energy(self.sampler.current_energy());
            }
            if iteration % progress_interval == 0 {
                observer.on_progress(&ProgressReport {
                    iteration,
                    energy: self.sampler.current_energy(),
                    best_energy: self.state.best_energy(),
                    best_iter: self.state.best_iter(),
                    stats: self.sampler.stats(),
                });
            }
        }

        self.state.adopt_initial_best(self.sampler.current_energy());
        let summary = self.summary();
        info!(
            "Done in {:.2}s. Best energy={:.6} at iter {}",
            started.elapsed().as_secs_f64(),
            summary.best_energy,
            summary.best_iter
        );
        if let Some(trace) = &summary.trace {
            info!(
                "Trace: {} samples in [{:.6}, {:.6}], mean {:.6}, {} below ||∇u||∞ = {:.6}",
                trace.samples,
                trace.min,
                trace.max,
                trace.mean,
                trace.below_baseline,
                trace.baseline
            );
        }
        summary
    }

    /// Summary of the state as it stands
    ///
    /// Valid at any point: before any best is recorded the zero correction is
    /// the best field, so its energy is reported with `best_iter = -1`.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let stats = self.sampler.stats();
        let best_energy = if self.state.best_iter().is_some() {
            self.state.best_energy()
        } else {
            self.initial_energy
        };
        RunSummary {
            config: self.config.clone(),
            seed: self.seed,
            iterations: stats.total(),
            initial_energy: self.initial_energy,
            final_energy: self.sampler.current_energy(),
            best_energy,
            best_iter: self.state.best_iter().map_or(-1, |it| it as i64),
            samples: self.state.energies().len(),
            stats,
            trace: TraceStats::from_trace(self.state.energies(), self.initial_energy),
        }
    }

    /// Write every output file into `dir`
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Output`] naming the first file that fails
    pub fn persist(&self, dir: &Path, summary: &RunSummary) -> Result<Vec<PathBuf>, SimError> {
        persistence::persist_all(dir, &self.state, summary)
    }
}
