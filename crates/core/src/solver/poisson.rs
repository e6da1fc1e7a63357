//! Spectral Poisson solver
//!
//! Solves `∇²u = f` on the periodic N×N grid in Fourier space.
//!
//! # Method
//!
//! 1. Forward 2D DFT of `f` gives `F̂(kx, ky)`
//! 2. Each mode is divided by the Laplacian symbol `-4π²(kx² + ky²)`, where
//!    index `i` maps to the signed frequency `i` for `i ≤ N/2` and `i - N`
//!    above. The DC mode is undetermined and set to exactly zero, which pins
//!    the mean of `u` to zero.
//! 3. Inverse 2D DFT, real part, divided by `N²`
//!
//! The full complex transform is used. Since the symbol only depends on
//! `kx²` and `ky²`, the spectrum of a real input stays Hermitian and the
//! result matches a real-to-complex half-spectrum solve up to rounding.

use crate::grid::PeriodicGrid;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::debug;

/// Signed frequency of DFT bin `index` on an `n`-point axis
///
/// Bins above `n/2` represent negative frequencies.
#[must_use]
pub fn signed_frequency(index: usize, n: usize) -> i64 {
    if index <= n / 2 {
        index as i64
    } else {
        index as i64 - n as i64
    }
}

/// Spectral symbol of the Laplacian used by the solver: `-4π²(kx² + ky²)`
#[must_use]
pub fn laplacian_symbol(kx: i64, ky: i64) -> f64 {
    -4.0 * PI * PI * (kx * kx + ky * ky) as f64
}

/// Planned forward/inverse transforms for one grid size
pub struct SpectralPoissonSolver {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl SpectralPoissonSolver {
    /// Plan the transforms for an `size × size` grid
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Grid size must be positive");
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    /// Grid size this solver was planned for
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Solve `∇²u = f` for `u` with zero mean
    ///
    /// # Panics
    ///
    /// Panics if `source` does not match the planned size
    #[must_use]
    pub fn solve(&self, source: &PeriodicGrid) -> PeriodicGrid {
        let n = self.size;
        assert_eq!(source.size(), n, "Source grid does not match solver size");

        // Row-major spectrum buffer: buffer[i * n + j] holds cell (i, j)
        let mut buffer: Vec<Complex<f64>> = (0..n * n)
            .map(|idx| Complex::new(source[(idx / n, idx % n)], 0.0))
            .collect();
        let mut scratch = vec![Complex::new(0.0, 0.0); n * n];

        transform_2d(self.forward.as_ref(), &mut buffer, &mut scratch, n);

        for i in 0..n {
            let kx = signed_frequency(i, n);
            for j in 0..n {
                let ky = signed_frequency(j, n);
                let coefficient = &mut buffer[i * n + j];
                if kx == 0 && ky == 0 {
                    *coefficient = Complex::new(0.0, 0.0);
                } else {
                    *coefficient /= laplacian_symbol(kx, ky);
                }
            }
        }

        transform_2d(self.inverse.as_ref(), &mut buffer, &mut scratch, n);

        let normalization = (n * n) as f64;
        let potential = PeriodicGrid::from_fn(n, |i, j| buffer[i * n + j].re / normalization);
        debug!(
            "Solved periodic Poisson equation on {}x{} grid (mean u = {:.3e})",
            n,
            n,
            potential.mean()
        );
        potential
    }
}

/// Separable 2D transform: all rows, then all columns via a transpose
fn transform_2d(
    fft: &dyn Fft<f64>,
    buffer: &mut [Complex<f64>],
    scratch: &mut [Complex<f64>],
    n: usize,
) {
    // `process` handles every length-n chunk of the buffer
    fft.process(buffer);
    transpose(buffer, scratch, n);
    fft.process(scratch);
    transpose(scratch, buffer, n);
}

fn transpose(src: &[Complex<f64>], dst: &mut [Complex<f64>], n: usize) {
    for i in 0..n {
        for j in 0..n {
            dst[j * n + i] = src[i * n + j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signed_frequency() {
        let even: Vec<i64> = (0..6).map(|i| signed_frequency(i, 6)).collect();
        assert_eq!(even, vec![0, 1, 2, 3, -2, -1]);

        let odd: Vec<i64> = (0..5).map(|i| signed_frequency(i, 5)).collect();
        assert_eq!(odd, vec![0, 1, 2, -2, -1]);
    }

    #[test]
    fn test_laplacian_symbol() {
        assert_eq!(laplacian_symbol(0, 0), 0.0);
        assert_relative_eq!(laplacian_symbol(1, -2), -20.0 * PI * PI, max_relative = 1e-15);
    }

    #[test]
    fn test_zero_mean_for_any_source() {
        let n = 9;
        // Deliberately non-zero mean and asymmetric
        let source = PeriodicGrid::from_fn(n, |i, j| ((i * 7 + j * 3) % 5) as f64 - 0.3 * j as f64);
        let u = SpectralPoissonSolver::new(n).solve(&source);
        assert!(u.mean().abs() < 1e-14, "mean = {}", u.mean());
    }

    #[test]
    fn test_constant_source_gives_zero_potential() {
        let source = PeriodicGrid::from_fn(6, |_, _| 2.0);
        let u = SpectralPoissonSolver::new(6).solve(&source);
        assert!(u.max_abs() < 1e-14);
    }

    #[test]
    fn test_single_mode_amplitude() {
        // f = cos(2π k i / N) maps to u = f / (-4π² k²)
        let n = 16;
        let k = 3;
        let source = PeriodicGrid::from_fn(n, |i, _| {
            (2.0 * PI * (k * i) as f64 / n as f64).cos()
        });
        let u = SpectralPoissonSolver::new(n).solve(&source);
        let scale = 1.0 / laplacian_symbol(k as i64, 0);
        for i in 0..n {
            for j in 0..n {
                assert_relative_eq!(u[(i, j)], source[(i, j)] * scale, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_nyquist_mode_even_grid() {
        // Checkerboard along columns lives entirely in the ky = N/2 bin
        let n = 8;
        let source = PeriodicGrid::from_fn(n, |_, j| if j % 2 == 0 { 1.0 } else { -1.0 });
        let u = SpectralPoissonSolver::new(n).solve(&source);
        let scale = 1.0 / laplacian_symbol(0, (n / 2) as i64);
        for i in 0..n {
            for j in 0..n {
                assert_relative_eq!(u[(i, j)], source[(i, j)] * scale, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_impulse_potential_is_symmetric() {
        let n = 10;
        let c = n / 2;
        let source = PeriodicGrid::from_fn(n, |i, j| if i == c && j == c { 1.0 } else { 0.0 });
        let u = SpectralPoissonSolver::new(n).solve(&source);

        for d in 1..c as isize {
            let ci = c as isize;
            let reference = u.at(ci + d, ci);
            assert_relative_eq!(u.at(ci - d, ci), reference, epsilon = 1e-15);
            assert_relative_eq!(u.at(ci, ci + d), reference, epsilon = 1e-15);
            assert_relative_eq!(u.at(ci, ci - d), reference, epsilon = 1e-15);
        }
        // The source sits at the potential minimum
        let min = u.as_matrix().min();
        assert_eq!(u[(c, c)], min);
    }
}
