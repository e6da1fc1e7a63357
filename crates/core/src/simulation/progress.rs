//! Progress reporting during the sampling loop

use crate::sampler::SamplerStats;
use tracing::info;

/// Snapshot handed to a [`ProgressObserver`] at the progress cadence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Iteration just completed
    pub iteration: u64,
    /// Energy of the current correction field
    pub energy: f64,
    /// Best energy so far
    pub best_energy: f64,
    /// Iteration of the best energy
    pub best_iter: Option<u64>,
    /// Outcome counts so far
    pub stats: SamplerStats,
}

/// Receiver of periodic progress reports
pub trait ProgressObserver {
    fn on_progress(&mut self, report: &ProgressReport);
}

/// Logs every report at `info` level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_progress(&mut self, report: &ProgressReport) {
        info!(
            "Iter {}, best ||∇u+Φ||∞ = {:.6} at {}, current {:.6}, accept rate {:.3}",
            report.iteration,
            report.best_energy,
            report.best_iter.map_or(-1, |it| it as i64),
            report.energy,
            report.stats.acceptance_rate()
        );
    }
}

/// Ignores every report
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressObserver for SilentProgress {
    fn on_progress(&mut self, _report: &ProgressReport) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(&ProgressReport),
{
    fn on_progress(&mut self, report: &ProgressReport) {
        self(report);
    }
}
