//! Run configuration
//!
//! Every parameter of an experiment, with defaults equal to the reference run
//! (30×30 grid, 10⁸ iterations, σ = 1e-7, β = 1000). Configurations can be
//! loaded from JSON; missing keys fall back to the defaults.

use crate::error::SimError;
use crate::sampler::SamplerParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Point source placed on the grid as the right-hand side `f`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    pub row: usize,
    pub col: usize,
    pub strength: f64,
}

impl PointSource {
    /// Unit impulse at the grid center `(N/2, N/2)`
    #[must_use]
    pub fn centered(grid_size: usize) -> Self {
        Self {
            row: grid_size / 2,
            col: grid_size / 2,
            strength: 1.0,
        }
    }
}

/// Parameters of one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Grid size N
    pub grid_size: usize,
    /// Number of sampler iterations
    pub iterations: u64,
    /// Standard deviation of the Gaussian plaquette magnitude
    pub step_std_dev: f64,
    /// Inverse temperature
    pub beta: f64,
    /// Record the energy every this many iterations
    pub sample_interval: u64,
    /// Capacity of the energy trace; `iterations / sample_interval` when unset
    pub max_samples: Option<usize>,
    /// Emit a progress report every this many iterations
    pub progress_interval: u64,
    /// RNG seed; the wall clock when unset
    pub seed: Option<u64>,
    /// Point source; a centered unit impulse when unset
    pub source: Option<PointSource>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            grid_size: 30,
            iterations: 100_000_000,
            step_std_dev: 1e-7,
            beta: 1000.0,
            sample_interval: 1_000_000,
            max_samples: None,
            progress_interval: 10_000,
            seed: None,
            source: None,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigRead`] if the file cannot be read and
    /// [`SimError::ConfigParse`] if it is not a valid configuration
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            SimError::ConfigParse { message, .. } => SimError::ConfigParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse a configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigParse`] if the text is not a valid configuration
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        serde_json::from_str(text).map_err(|e| SimError::ConfigParse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first bad parameter
    pub fn validate(&self) -> Result<(), SimError> {
        if self.grid_size == 0 {
            return Err(SimError::invalid("grid_size", "must be at least 1"));
        }
        if !self.step_std_dev.is_finite() || self.step_std_dev < 0.0 {
            return Err(SimError::invalid(
                "step_std_dev",
                format!("must be finite and non-negative, got {}", self.step_std_dev),
            ));
        }
        if !self.beta.is_finite() {
            return Err(SimError::invalid("beta", format!("must be finite, got {}", self.beta)));
        }
        if self.sample_interval == 0 {
            return Err(SimError::invalid("sample_interval", "must be at least 1"));
        }
        if self.progress_interval == 0 {
            return Err(SimError::invalid("progress_interval", "must be at least 1"));
        }
        let source = self.point_source();
        if source.row >= self.grid_size || source.col >= self.grid_size {
            return Err(SimError::invalid(
                "source",
                format!(
                    "({}, {}) lies outside the {}x{} grid",
                    source.row, source.col, self.grid_size, self.grid_size
                ),
            ));
        }
        if !source.strength.is_finite() {
            return Err(SimError::invalid("source", "strength must be finite"));
        }
        Ok(())
    }

    /// Configured source, or a centered unit impulse
    #[must_use]
    pub fn point_source(&self) -> PointSource {
        self.source.unwrap_or_else(|| PointSource::centered(self.grid_size))
    }

    /// Capacity of the energy trace
    #[must_use]
    pub fn sample_capacity(&self) -> usize {
        self.max_samples
            .unwrap_or_else(|| (self.iterations / self.sample_interval.max(1)) as usize)
    }

    #[must_use]
    pub fn sampler_params(&self) -> SamplerParams {
        SamplerParams {
            step_std_dev: self.step_std_dev,
            beta: self.beta,
        }
    }
}
