//! Forward-difference gradient on the periodic grid

use crate::grid::{PeriodicGrid, VectorField};

/// Discrete gradient of `u` by periodic forward differences
///
/// - `ux[i][j] = u[i+1][j] - u[i][j]`
/// - `uy[i][j] = u[i][j+1] - u[i][j]`
///
/// with indices taken modulo N.
#[must_use]
pub fn forward_gradient(u: &PeriodicGrid) -> VectorField {
    let n = u.size();
    let x = PeriodicGrid::from_fn(n, |i, j| u[((i + 1) % n, j)] - u[(i, j)]);
    let y = PeriodicGrid::from_fn(n, |i, j| u[(i, (j + 1) % n)] - u[(i, j)]);
    VectorField { x, y }
}
