//! Periodic field storage
//!
//! Scalar and vector fields on an N×N torus. Every field in the experiment is
//! square, double precision, and wraps around in both directions, so index
//! arithmetic is always taken modulo the grid size.

use nalgebra::DMatrix;
use std::ops::{Index, IndexMut};

/// Square scalar field with wraparound indexing
///
/// Values are stored in an `N×N` [`DMatrix`] addressed as `(row, column)`.
/// In-range access goes through `Index<(usize, usize)>`; the signed accessors
/// ([`at`](Self::at), [`set`](Self::set), [`add`](Self::add)) accept any
/// integer coordinates and wrap them onto the torus.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicGrid {
    data: DMatrix<f64>,
}

impl PeriodicGrid {
    /// Create an `size × size` grid initialized to zero
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            data: DMatrix::zeros(size, size),
        }
    }

    /// Create a grid whose cell `(row, col)` is `f(row, col)`
    #[must_use]
    pub fn from_fn<F>(size: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            data: DMatrix::from_fn(size, size, f),
        }
    }

    /// Number of rows (equal to the number of columns)
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    /// Map any integer coordinate onto `[0, N)`
    ///
    /// Uses Euclidean remainder, so negative coordinates wrap to the far edge:
    /// `wrap(-1) == N - 1`.
    #[must_use]
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.size() as isize) as usize
    }

    /// Value at `(row, col)` taken modulo the grid size
    #[must_use]
    pub fn at(&self, row: isize, col: isize) -> f64 {
        self.data[(self.wrap(row), self.wrap(col))]
    }

    /// Overwrite the value at `(row, col)` taken modulo the grid size
    pub fn set(&mut self, row: isize, col: isize, value: f64) {
        let cell = (self.wrap(row), self.wrap(col));
        self.data[cell] = value;
    }

    /// Add `amount` to the value at `(row, col)` taken modulo the grid size
    pub fn add(&mut self, row: isize, col: isize, amount: f64) {
        let cell = (self.wrap(row), self.wrap(col));
        self.data[cell] += amount;
    }

    /// Arithmetic mean over all cells
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.data.mean()
    }

    /// Largest absolute cell value
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Copy all values from a grid of the same size
    ///
    /// # Panics
    ///
    /// Panics if the grids differ in size
    pub fn copy_from(&mut self, other: &PeriodicGrid) {
        self.data.copy_from(&other.data);
    }

    /// Values of one row, left to right
    pub fn row(&self, row: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.size()).map(move |col| self.data[(row, col)])
    }

    /// Underlying matrix
    #[must_use]
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }
}

impl Index<(usize, usize)> for PeriodicGrid {
    type Output = f64;

    fn index(&self, cell: (usize, usize)) -> &f64 {
        &self.data[cell]
    }
}

impl IndexMut<(usize, usize)> for PeriodicGrid {
    fn index_mut(&mut self, cell: (usize, usize)) -> &mut f64 {
        &mut self.data[cell]
    }
}

/// Two-component field on the same periodic grid
///
/// Used both for the base gradient `(ux, uy)` and for the correction field
/// `(phi_x, phi_y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField {
    /// Row-direction component
    pub x: PeriodicGrid,
    /// Column-direction component
    pub y: PeriodicGrid,
}

impl VectorField {
    /// Zero field of the given size
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Self {
            x: PeriodicGrid::new(size),
            y: PeriodicGrid::new(size),
        }
    }

    /// Grid size shared by both components
    #[must_use]
    pub fn size(&self) -> usize {
        self.x.size()
    }

    /// Deep copy of both components from another field
    pub fn copy_from(&mut self, other: &VectorField) {
        self.x.copy_from(&other.x);
        self.y.copy_from(&other.y);
    }

    /// True when every cell of both components is exactly zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x.as_matrix().iter().chain(self.y.as_matrix().iter()).all(|&v| v == 0.0)
    }
}
