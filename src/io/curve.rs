//! Read/write run JSON files.
//!
//! The run JSON is the portable representation of a fit:
//! - grid settings and the (unused) measurement temperature
//! - the measurements themselves
//! - per mechanism: mean `σE0`, the point matches and a decimated `(η, σ, S)` curve
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::domain::{CurveFile, CurveGrid, FitConfig, FitRun, MechanismFit, MechanismRecord, ReducedFermiGrid};
use crate::error::AppError;

/// Upper bound on stored curve points per mechanism.
pub const MAX_CURVE_POINTS: usize = 500;

/// Build the serializable representation of a run.
pub fn curve_file_from_run(run: &FitRun, config: &FitConfig) -> CurveFile {
    let mechanisms = run
        .fits
        .iter()
        .map(|fit| MechanismRecord {
            mechanism: fit.mechanism,
            exponent: fit.mechanism.exponent(),
            sigma_e0_mean: fit.sigma_e0_mean,
            matches: fit.matches.clone(),
            curve: decimate(fit, &run.grid, MAX_CURVE_POINTS),
        })
        .collect();

    CurveFile {
        tool: "sfit".to_string(),
        generated_at: Local::now().to_rfc3339(),
        efs: run.grid.start,
        efe: run.grid.end,
        npts: run.grid.len(),
        temperature: config.temperature,
        bounds: config.bounds,
        measurements: run.measurements.clone(),
        mechanisms,
    }
}

/// Write a run JSON file.
pub fn write_curve_json(path: &Path, run: &FitRun, config: &FitConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = curve_file_from_run(run, config);
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush curve JSON: {e}")))?;

    Ok(())
}

/// Read a run JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Keep every k-th grid point (always including the last) so at most `max`
/// points are stored.
fn decimate(fit: &MechanismFit, grid: &ReducedFermiGrid, max: usize) -> CurveGrid {
    let n = grid.len();
    let stride = n.div_ceil(max.max(1)).max(1);

    let mut indices: Vec<usize> = (0..n).step_by(stride).collect();
    if n > 0 && indices.last() != Some(&(n - 1)) {
        indices.push(n - 1);
    }

    CurveGrid {
        reduced_fermi: indices.iter().map(|&i| grid.values[i]).collect(),
        conductivity: indices.iter().map(|&i| fit.conductivity_curve[i]).collect(),
        seebeck: indices.iter().map(|&i| fit.seebeck_curve[i]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Measurement;
    use crate::fit::{fit_all, linspace_grid};

    fn small_run(npts: usize) -> FitRun {
        let grid = linspace_grid(-8.0, 90.0, npts).unwrap();
        let measurements = vec![
            Measurement { conductivity: 1e5, seebeck: 150.0 },
            Measurement { conductivity: 5e5, seebeck: 80.0 },
        ];
        let fits = fit_all(&grid, &measurements).unwrap();
        FitRun { grid, measurements, fits }
    }

    #[test]
    fn decimation_caps_points_and_keeps_endpoints() {
        let run = small_run(1_201);
        let file = curve_file_from_run(&run, &FitConfig::default());
        assert_eq!(file.npts, 1_201);
        for record in &file.mechanisms {
            let g = &record.curve;
            assert!(g.reduced_fermi.len() <= MAX_CURVE_POINTS + 1);
            assert_eq!(g.reduced_fermi[0], -8.0);
            assert_eq!(*g.reduced_fermi.last().unwrap(), 90.0);
            assert_eq!(g.conductivity.len(), g.seebeck.len());
        }
    }

    #[test]
    fn json_round_trip_preserves_fit_summary() {
        let run = small_run(300);
        let config = FitConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        write_curve_json(&path, &run, &config).unwrap();
        let back = read_curve_json(&path).unwrap();

        assert_eq!(back.tool, "sfit");
        assert_eq!(back.measurements, run.measurements);
        assert_eq!(back.mechanisms.len(), 3);
        for (record, fit) in back.mechanisms.iter().zip(&run.fits) {
            assert_eq!(record.mechanism, fit.mechanism);
            assert_eq!(record.sigma_e0_mean, fit.sigma_e0_mean);
            assert_eq!(record.matches, fit.matches);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_final_flush_is_an_error() {
        // Writes to /dev/full fail with ENOSPC once the buffer is flushed.
        let path = Path::new("/dev/full");
        if !path.exists() {
            return;
        }
        let err = write_curve_json(path, &small_run(2), &FitConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_curve_json(&path).unwrap_err().exit_code(), 2);
    }
}
