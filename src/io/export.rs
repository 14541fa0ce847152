//! Export per-measurement matches to CSV.
//!
//! One row per measurement per mechanism, easy to consume in spreadsheets.

use std::path::Path;

use serde::Serialize;

use crate::domain::FitRun;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    mechanism: &'a str,
    exponent: u32,
    index: usize,
    conductivity: f64,
    seebeck: f64,
    grid_index: usize,
    reduced_fermi: f64,
    sigma_e0: f64,
}

/// Write per-measurement results to a CSV file.
pub fn write_results_csv(path: &Path, run: &FitRun) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    for fit in &run.fits {
        for (j, (m, p)) in run.measurements.iter().zip(&fit.matches).enumerate() {
            writer
                .serialize(MatchRow {
                    mechanism: fit.mechanism.key(),
                    exponent: fit.mechanism.exponent(),
                    index: j + 1,
                    conductivity: m.conductivity,
                    seebeck: m.seebeck,
                    grid_index: p.grid_index,
                    reduced_fermi: p.reduced_fermi,
                    sigma_e0: p.sigma_e0,
                })
                .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Measurement;
    use crate::fit::{fit_all, linspace_grid};

    #[test]
    fn writes_one_row_per_point_and_mechanism() {
        let grid = linspace_grid(-8.0, 90.0, 200).unwrap();
        let measurements = vec![
            Measurement { conductivity: 1e5, seebeck: 150.0 },
            Measurement { conductivity: 5e5, seebeck: 80.0 },
        ];
        let fits = fit_all(&grid, &measurements).unwrap();
        let run = FitRun { grid, measurements, fits };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.csv");
        write_results_csv(&path, &run).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "mechanism,exponent,index,conductivity,seebeck,grid_index,reduced_fermi,sigma_e0"
        );
        assert_eq!(lines.len(), 1 + 3 * 2);
        assert!(lines[1].starts_with("acoustic,0,1,"));
        assert!(lines[6].starts_with("impurity,2,2,"));
    }
}
