//! Reduced Fermi-level grid generation.
//!
//! The grid is a plain linear sweep shared by all mechanisms. The nearest-match
//! lookup never interpolates, so `npts` directly bounds the resolution of the
//! fitted reduced Fermi levels.

use crate::domain::ReducedFermiGrid;
use crate::error::AppError;

/// Generate `steps` evenly spaced points between `start` and `end` (inclusive).
///
/// `steps = 1` yields `[start]`.
pub fn linspace_grid(start: f64, end: f64, steps: usize) -> Result<ReducedFermiGrid, AppError> {
    if !(start.is_finite() && end.is_finite()) {
        return Err(AppError::new(
            2,
            format!("Invalid Fermi-level range: start={start}, end={end} (must be finite)."),
        ));
    }
    if end < start {
        return Err(AppError::new(
            2,
            format!("Invalid Fermi-level range: start={start} > end={end}."),
        ));
    }
    if steps == 0 {
        return Err(AppError::new(2, "Grid size (npts) must be >= 1."));
    }

    let values = if steps == 1 {
        vec![start]
    } else {
        let step = (end - start) / (steps as f64 - 1.0);
        let mut out: Vec<f64> = (0..steps).map(|i| start + step * i as f64).collect();
        // Pin the endpoint so rounding never leaves it short.
        out[steps - 1] = end;
        out
    };

    Ok(ReducedFermiGrid { start, end, values })
}
