//! Random source abstraction
//!
//! The sampler draws from a [`RandomSource`] so that tests can script every
//! draw. [`SeededSource`] is the production source: ChaCha8 seeded from a
//! `u64`, so a recorded seed replays the exact trajectory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use std::time::{SystemTime, UNIX_EPOCH};

/// Draws consumed by the sampler
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`
    fn uniform_index(&mut self, upper: usize) -> usize;

    /// Uniform real in `[0, 1)`
    fn uniform_unit(&mut self) -> f64;

    /// Zero-mean Gaussian with the given standard deviation
    fn gaussian(&mut self, std_dev: f64) -> f64;
}

/// Seeded ChaCha8 random source
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededSource {
    /// Create a source from an explicit seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this source was created with
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn uniform_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }

    fn uniform_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn gaussian(&mut self, std_dev: f64) -> f64 {
        self.rng.sample::<f64, _>(StandardNormal) * std_dev
    }
}

/// Seed derived from the wall clock (whole seconds since the UNIX epoch)
#[must_use]
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
