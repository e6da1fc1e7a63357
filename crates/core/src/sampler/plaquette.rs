//! Divergence-free plaquette moves
//!
//! A plaquette move at cell `(i, j)` with magnitude `δ` adds
//!
//! - `+δ` to `phi_x[i][j]`
//! - `-δ` to `phi_x[i][j+1]`
//! - `-δ` to `phi_y[i][j]`
//! - `+δ` to `phi_y[i+1][j]`
//!
//! (indices mod N). This is the discrete curl of a bump at `(i, j)`: the four
//! increments cancel, so the net flux of the correction field is unchanged.
//! Applying a move snapshots the four previous values so that reverting
//! restores the field bit-for-bit.

use crate::grid::VectorField;

/// Component of the correction field an increment applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// `phi_x`
    X,
    /// `phi_y`
    Y,
}

/// One of the four additions making up a plaquette move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Increment {
    pub component: Component,
    pub row: usize,
    pub col: usize,
    pub amount: f64,
}

/// Proposed four-point update around one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plaquette {
    pub row: usize,
    pub col: usize,
    pub delta: f64,
}

impl Plaquette {
    #[must_use]
    pub fn new(row: usize, col: usize, delta: f64) -> Self {
        Self { row, col, delta }
    }

    /// The four increments on an `n × n` grid, in application order
    #[must_use]
    pub fn increments(&self, n: usize) -> [Increment; 4] {
        let (i, j, delta) = (self.row, self.col, self.delta);
        let next_col = (j + 1) % n;
        let next_row = (i + 1) % n;
        let increment = |component, row, col, amount| Increment {
            component,
            row,
            col,
            amount,
        };
        [
            increment(Component::X, i, j, delta),
            increment(Component::X, i, next_col, -delta),
            increment(Component::Y, i, j, -delta),
            increment(Component::Y, next_row, j, delta),
        ]
    }

    /// Cells whose magnitude can change: `(i, j)`, `(i, j+1)`, `(i+1, j)`
    #[must_use]
    pub fn touched_cells(&self, n: usize) -> [(usize, usize); 3] {
        [
            (self.row, self.col),
            (self.row, (self.col + 1) % n),
            ((self.row + 1) % n, self.col),
        ]
    }

    /// Apply the move, remembering the values it overwrote
    pub fn apply(self, field: &mut VectorField) -> AppliedPlaquette {
        let n = field.size();
        let increments = self.increments(n);
        let mut previous = [0.0; 4];
        for (slot, inc) in previous.iter_mut().zip(increments.iter()) {
            let value = component_mut(field, inc.component, inc.row, inc.col);
            *slot = *value;
            *value += inc.amount;
        }
        AppliedPlaquette {
            plaquette: self,
            increments,
            previous,
        }
    }
}

/// A move that has been applied and can still be undone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedPlaquette {
    plaquette: Plaquette,
    increments: [Increment; 4],
    previous: [f64; 4],
}

impl AppliedPlaquette {
    /// The move that was applied
    #[must_use]
    pub fn plaquette(&self) -> Plaquette {
        self.plaquette
    }

    /// Undo the move, restoring the exact previous values
    pub fn revert(self, field: &mut VectorField) {
        // Reverse order so repeated cells (1×1 grid) end on their original value
        for (inc, &value) in self.increments.iter().zip(self.previous.iter()).rev() {
            *component_mut(field, inc.component, inc.row, inc.col) = value;
        }
    }
}

fn component_mut(
    field: &mut VectorField,
    component: Component,
    row: usize,
    col: usize,
) -> &mut f64 {
    match component {
        Component::X => &mut field.x[(row, col)],
        Component::Y => &mut field.y[(row, col)],
    }
}
