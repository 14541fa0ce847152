//! Shared fit pipeline used by both the CLI and the TUI.
//!
//! Workflow: validate config -> load measurements -> build grid -> fit every
//! mechanism. Front-ends only handle presentation.

use log::{debug, info};

use crate::domain::{FitConfig, FitRun, Measurement, PlotBounds};
use crate::error::AppError;

/// Execute the full pipeline, reading measurements from `config.data_path`.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    validate_config(config)?;
    let measurements = crate::io::load_measurements(&config.data_path, config.delimiter)?;
    run_fit_with_measurements(config, measurements)
}

/// Execute the pipeline on measurements that are already in memory.
pub fn run_fit_with_measurements(
    config: &FitConfig,
    measurements: Vec<Measurement>,
) -> Result<FitRun, AppError> {
    validate_config(config)?;
    if measurements.is_empty() {
        return Err(AppError::new(3, "No measurements to fit."));
    }

    debug!(
        "temperature {} K is recorded with the run but not used by the transport model",
        config.temperature
    );

    let grid = crate::fit::linspace_grid(config.efs, config.efe, config.npts)?;
    info!(
        "reduced Fermi grid: {} point(s) over [{}, {}]",
        grid.len(),
        grid.start,
        grid.end
    );

    let fits = crate::fit::fit_all(&grid, &measurements)?;

    Ok(FitRun {
        grid,
        measurements,
        fits,
    })
}

/// Check sweep and plot settings before any work is done.
pub fn validate_config(config: &FitConfig) -> Result<(), AppError> {
    if config.npts == 0 {
        return Err(AppError::new(2, "--npts must be >= 1."));
    }
    if !config.efs.is_finite() || !config.efe.is_finite() {
        return Err(AppError::new(2, "--efs and --efe must be finite."));
    }
    if config.efs > config.efe {
        return Err(AppError::new(
            2,
            format!("--efs ({}) must not exceed --efe ({}).", config.efs, config.efe),
        ));
    }
    if !config.temperature.is_finite() || config.temperature <= 0.0 {
        return Err(AppError::new(2, "--temperature must be a positive number."));
    }
    validate_bounds(&config.bounds)
}

fn validate_bounds(bounds: &PlotBounds) -> Result<(), AppError> {
    let check = |name: &str, [lo, hi]: [f64; 2]| {
        if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo < hi {
            Ok(())
        } else {
            Err(AppError::new(
                2,
                format!("Invalid {name} plot limits [{lo}, {hi}]: need 0 < min < max."),
            ))
        }
    };
    check("conductivity", bounds.sigma)?;
    check("Seebeck", bounds.seebeck)
}
