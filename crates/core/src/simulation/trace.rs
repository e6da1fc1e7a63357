//! Statistics of the sampled energy trace
//!
//! Summarizes `energies.csv` against the baseline `||∇u||∞` (the energy of
//! the zero correction): range, mean, spread, how many samples improved on
//! the baseline, and a fixed-width histogram.

use serde::{Deserialize, Serialize};

/// Number of histogram bins
pub const HISTOGRAM_BINS: usize = 50;

/// Equal-width histogram over `[lower, upper]`
///
/// The last bin is closed on the right so the maximum is counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning their range
    ///
    /// A degenerate range (all values equal) puts everything in the first bin.
    #[must_use]
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut counts = vec![0; bins.max(1)];
        let last = counts.len() - 1;
        let width = (upper - lower) / counts.len() as f64;

        for &value in values {
            let bin = if width > 0.0 {
                (((value - lower) / width) as usize).min(last)
            } else {
                0
            };
            counts[bin] += 1;
        }

        Self {
            lower,
            upper,
            counts,
        }
    }

    /// Width of one bin
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// Total number of binned values
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Summary of an energy trace relative to the uncorrected field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStats {
    /// Number of samples
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// `||∇u||∞`, the energy with no correction
    pub baseline: f64,
    /// Samples strictly below the baseline
    pub below_baseline: usize,
    pub histogram: Histogram,
}

impl TraceStats {
    /// Statistics of `energies`, or `None` for an empty trace
    #[must_use]
    pub fn from_trace(energies: &[f64], baseline: f64) -> Option<Self> {
        if energies.is_empty() {
            return None;
        }

        let count = energies.len() as f64;
        let mean = energies.iter().sum::<f64>() / count;
        let variance = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / count;
        let histogram = Histogram::from_values(energies, HISTOGRAM_BINS);

        Some(Self {
            samples: energies.len(),
            min: histogram.lower,
            max: histogram.upper,
            mean,
            std_dev: variance.sqrt(),
            baseline,
            below_baseline: energies.iter().filter(|&&e| e < baseline).count(),
            histogram,
        })
    }

    /// Relative improvement of the lowest sample over the baseline
    ///
    /// `0.1` means the best sampled field is 10% below `||∇u||∞`.
    #[must_use]
    pub fn best_improvement(&self) -> f64 {
        if self.baseline > 0.0 {
            (self.baseline - self.min) / self.baseline
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_trace_has_no_stats() {
        assert_eq!(TraceStats::from_trace(&[], 1.0), None);
    }

    #[test]
    fn test_trace_moments() {
        let stats = TraceStats::from_trace(&[1.0, 2.0, 3.0, 4.0], 2.5).unwrap();
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.std_dev, 1.25_f64.sqrt(), epsilon = 1e-15);
        assert_eq!(stats.below_baseline, 2);
        assert_relative_eq!(stats.best_improvement(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_histogram_counts_every_sample() {
        let values = [0.0, 0.25, 0.5, 0.75, 1.0];
        let histogram = Histogram::from_values(&values, 4);
        assert_eq!(histogram.counts, vec![1, 1, 1, 2]);
        assert_eq!(histogram.total(), 5);
        assert_eq!(histogram.bin_width(), 0.25);
    }

    #[test]
    fn test_constant_trace_lands_in_one_bin() {
        let stats = TraceStats::from_trace(&[0.7; 6], 0.7).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.below_baseline, 0);
        assert_eq!(stats.histogram.counts[0], 6);
        assert_eq!(stats.histogram.total(), 6);
        assert_eq!(stats.histogram.counts.len(), HISTOGRAM_BINS);
    }
}
