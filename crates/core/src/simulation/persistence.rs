//! Writing run results to disk
//!
//! One plain-text file per entity:
//!
//! - `u.csv`, `ux.csv`, `uy.csv`: potential and base gradient
//! - `phi_x.csv`, `phi_y.csv`: the best correction field (not the final one)
//! - `sum_x.csv`, `sum_y.csv`: the corrected field `∇u + Φ` for that best `Φ`
//! - `energies.csv`: the sampled energy trace, one value per line
//! - `summary.json`: seed, configuration, best-so-far record and trace
//!   statistics
//!
//! Grids are written row by row with 8 digits after the decimal point. Any
//! failure aborts the write and names the file.

use super::RunSummary;
use crate::error::SimError;
use crate::grid::{PeriodicGrid, SimulationState};
use crate::sampler::corrected_field;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Potential file name
pub const POTENTIAL_FILE: &str = "u.csv";
/// Row-direction gradient file name
pub const GRADIENT_X_FILE: &str = "ux.csv";
/// Column-direction gradient file name
pub const GRADIENT_Y_FILE: &str = "uy.csv";
/// Best correction, row-direction component
pub const CORRECTION_X_FILE: &str = "phi_x.csv";
/// Best correction, column-direction component
pub const CORRECTION_Y_FILE: &str = "phi_y.csv";
/// Corrected field `∇u + Φ`, row-direction component
pub const SUM_X_FILE: &str = "sum_x.csv";
/// Corrected field `∇u + Φ`, column-direction component
pub const SUM_Y_FILE: &str = "sum_y.csv";
/// Energy trace file name
pub const ENERGIES_FILE: &str = "energies.csv";
/// Run summary file name
pub const SUMMARY_FILE: &str = "summary.json";

/// Write a grid as comma-separated rows with 8 decimals per cell
///
/// # Errors
///
/// Propagates any write error from `writer`
pub fn write_grid_csv<W: Write>(writer: &mut W, grid: &PeriodicGrid) -> io::Result<()> {
    for i in 0..grid.size() {
        for (j, value) in grid.row(i).enumerate() {
            if j > 0 {
                writer.write_all(b",")?;
            }
            write!(writer, "{value:.8}")?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write one energy value per line with 8 decimals
///
/// # Errors
///
/// Propagates any write error from `writer`
pub fn write_energies_csv<W: Write>(writer: &mut W, energies: &[f64]) -> io::Result<()> {
    for energy in energies {
        writeln!(writer, "{energy:.8}")?;
    }
    Ok(())
}

/// Save a grid to `path`
///
/// # Errors
///
/// Returns [`SimError::Output`] naming `path` if it cannot be created or written
pub fn save_grid(path: &Path, grid: &PeriodicGrid) -> Result<(), SimError> {
    write_file(path, |w| write_grid_csv(w, grid))
}

/// Save the energy trace to `path`
///
/// # Errors
///
/// Returns [`SimError::Output`] naming `path` if it cannot be created or written
pub fn save_energies(path: &Path, energies: &[f64]) -> Result<(), SimError> {
    write_file(path, |w| write_energies_csv(w, energies))
}

/// Save the run summary as pretty-printed JSON
///
/// # Errors
///
/// Returns [`SimError::Output`] naming `path` if it cannot be created or written
pub fn save_summary(path: &Path, summary: &RunSummary) -> Result<(), SimError> {
    write_file(path, |w| {
        serde_json::to_writer_pretty(&mut *w, summary).map_err(io::Error::from)?;
        w.write_all(b"\n")
    })
}

/// Persist every output file into `dir`, creating it if needed
///
/// Returns the paths written, in write order.
///
/// # Errors
///
/// Returns [`SimError::Output`] for the first file (or directory) that fails
pub fn persist_all(
    dir: &Path,
    state: &SimulationState,
    summary: &RunSummary,
) -> Result<Vec<PathBuf>, SimError> {
    fs::create_dir_all(dir).map_err(|source| SimError::Output {
        path: dir.to_path_buf(),
        source,
    })?;

    let best = state.best_correction();
    let sum = corrected_field(state.gradient(), best);
    let grids = [
        (POTENTIAL_FILE, state.potential()),
        (GRADIENT_X_FILE, &state.gradient().x),
        (GRADIENT_Y_FILE, &state.gradient().y),
        (CORRECTION_X_FILE, &best.x),
        (CORRECTION_Y_FILE, &best.y),
        (SUM_X_FILE, &sum.x),
        (SUM_Y_FILE, &sum.y),
    ];

    let mut written = Vec::with_capacity(grids.len() + 2);
    for (name, grid) in grids {
        let path = dir.join(name);
        save_grid(&path, grid)?;
        written.push(path);
    }

    let energies_path = dir.join(ENERGIES_FILE);
    save_energies(&energies_path, state.energies())?;
    written.push(energies_path);

    let summary_path = dir.join(SUMMARY_FILE);
    save_summary(&summary_path, summary)?;
    written.push(summary_path);

    info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

fn write_file<F>(path: &Path, body: F) -> Result<(), SimError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let to_error = |source| SimError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    body(&mut writer).map_err(to_error)?;
    writer.flush().map_err(to_error)
}
