//! Periodic grids and the experiment state built on them

mod periodic;
mod state;

pub use periodic::{PeriodicGrid, VectorField};
pub use state::SimulationState;
