//! Max-norm energy functional
//!
//! The objective is the worst-case magnitude of the corrected field:
//!
//! `E = max over (i, j) of |(ux + phi_x, uy + phi_y)|`
//!
//! [`max_norm`] recomputes it from scratch in O(N²). [`EnergyTracker`] keeps
//! per-cell magnitudes so a plaquette move only touches three cells, and
//! rescans the grid only when the previous maximum cell shrinks. Both paths go
//! through [`cell_magnitude`], so their values are identical, not just close.

use crate::grid::{PeriodicGrid, VectorField};
use nalgebra::Vector2;

/// Magnitude of `base + correction` at one cell
#[inline]
#[must_use]
pub fn cell_magnitude(base: &VectorField, correction: &VectorField, row: usize, col: usize) -> f64 {
    let cell = (row, col);
    Vector2::new(base.x[cell] + correction.x[cell], base.y[cell] + correction.y[cell]).norm()
}

/// Full recomputation of the max-norm energy
#[must_use]
pub fn max_norm(base: &VectorField, correction: &VectorField) -> f64 {
    let n = base.size();
    let mut max = 0.0;
    for i in 0..n {
        for j in 0..n {
            let magnitude = cell_magnitude(base, correction, i, j);
            if magnitude > max {
                max = magnitude;
            }
        }
    }
    max
}

/// The corrected field `∇u + Φ`, cell by cell
#[must_use]
pub fn corrected_field(base: &VectorField, correction: &VectorField) -> VectorField {
    let n = base.size();
    VectorField {
        x: PeriodicGrid::from_fn(n, |i, j| base.x[(i, j)] + correction.x[(i, j)]),
        y: PeriodicGrid::from_fn(n, |i, j| base.y[(i, j)] + correction.y[(i, j)]),
    }
}

/// Incrementally maintained max-norm energy
#[derive(Debug, Clone)]
pub struct EnergyTracker {
    magnitudes: PeriodicGrid,
    max: f64,
    argmax: (usize, usize),
}

impl EnergyTracker {
    /// Build the tracker from the current fields
    #[must_use]
    pub fn new(base: &VectorField, correction: &VectorField) -> Self {
        let mut tracker = Self {
            magnitudes: PeriodicGrid::new(base.size()),
            max: 0.0,
            argmax: (0, 0),
        };
        tracker.recompute(base, correction);
        tracker
    }

    /// Current energy
    #[must_use]
    pub fn value(&self) -> f64 {
        self.max
    }

    /// Cell holding the current maximum
    #[must_use]
    pub fn argmax(&self) -> (usize, usize) {
        self.argmax
    }

    /// Recompute every cell magnitude and the maximum
    pub fn recompute(&mut self, base: &VectorField, correction: &VectorField) {
        let n = base.size();
        for i in 0..n {
            for j in 0..n {
                self.magnitudes[(i, j)] = cell_magnitude(base, correction, i, j);
            }
        }
        self.rescan();
    }

    /// Update the energy after the fields changed at `cells` only
    ///
    /// Cells may repeat (on a 1×1 grid every plaquette corner is the same cell).
    pub fn refresh(
        &mut self,
        base: &VectorField,
        correction: &VectorField,
        cells: &[(usize, usize)],
    ) {
        let mut max_shrank = false;
        for &cell in cells {
            let magnitude = cell_magnitude(base, correction, cell.0, cell.1);
            self.magnitudes[cell] = magnitude;
            if cell == self.argmax && magnitude < self.max {
                max_shrank = true;
            }
        }

        if max_shrank {
            self.rescan();
            return;
        }

        for &cell in cells {
            let magnitude = self.magnitudes[cell];
            if magnitude > self.max {
                self.max = magnitude;
                self.argmax = cell;
            }
        }
    }

    fn rescan(&mut self) {
        let n = self.magnitudes.size();
        self.max = 0.0;
        self.argmax = (0, 0);
        for i in 0..n {
            for j in 0..n {
                let magnitude = self.magnitudes[(i, j)];
                if magnitude > self.max {
                    self.max = magnitude;
                    self.argmax = (i, j);
                }
            }
        }
    }
}
