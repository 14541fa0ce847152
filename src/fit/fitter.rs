//! Nearest-match fitting for a single mechanism.
//!
//! Given:
//! - the grid `η_i`
//! - a mechanism's theoretical curve `S(η_i)` and `F_l(η_i)`
//! - measurements `(σ_j, S_j)`
//!
//! we find, for each measurement, the grid index minimizing `| |S(η_i)| - |S_j| |`,
//! back out `σE0_j = σ_j / ((l+1) F_l(η_i))`, average, and rebuild the
//! conductivity curve `σE0 · (l+1) · F_l(η_i)` over the whole grid.

use log::{debug, info};

use crate::domain::{Measurement, MechanismCurve, MechanismFit, PointMatch, ReducedFermiGrid, ScatteringMechanism};
use crate::error::AppError;
use crate::models::mechanism_curve;

/// Index of the curve value closest to `target` in absolute value.
///
/// Ties resolve to the first index. NaN entries never win. Returns `None` for
/// an empty (or all-NaN) curve.
pub fn nearest_index(curve: &[f64], target: f64) -> Option<usize> {
    let target = target.abs();
    let mut best: Option<(usize, f64)> = None;
    for (i, &s) in curve.iter().enumerate() {
        let dist = (s.abs() - target).abs();
        if dist.is_nan() {
            continue;
        }
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Match every measurement against one mechanism's curve and average `σE0`.
pub fn fit_mechanism(
    curve: &MechanismCurve,
    grid: &ReducedFermiGrid,
    measurements: &[Measurement],
) -> Result<MechanismFit, AppError> {
    if measurements.is_empty() {
        return Err(AppError::new(3, "No measurements to fit."));
    }
    if curve.seebeck.len() != grid.len() || curve.carrier_integral.len() != grid.len() {
        return Err(AppError::new(4, "Theoretical curve length does not match the grid."));
    }

    let mechanism = curve.mechanism;
    let prefactor = mechanism.prefactor();

    let mut matches = Vec::with_capacity(measurements.len());
    for (j, m) in measurements.iter().enumerate() {
        let grid_index = nearest_index(&curve.seebeck, m.seebeck).ok_or_else(|| {
            AppError::new(4, format!("No usable grid point for {}.", mechanism.display_name()))
        })?;
        let reduced_fermi = grid.values[grid_index];
        let sigma_e0 = m.conductivity / (prefactor * curve.carrier_integral[grid_index]);
        if !sigma_e0.is_finite() {
            return Err(AppError::new(
                4,
                format!(
                    "Non-finite sigma_E0 for measurement {} ({}) at eta={reduced_fermi}.",
                    j + 1,
                    mechanism.display_name()
                ),
            ));
        }
        debug!(
            "{}: point {} S={:.3} -> eta={reduced_fermi:.4} (index {grid_index}), sigma_E0={sigma_e0:.4e}",
            mechanism.key(),
            j + 1,
            m.seebeck
        );
        matches.push(PointMatch {
            grid_index,
            reduced_fermi,
            sigma_e0,
        });
    }

    let scales: Vec<f64> = matches.iter().map(|p| p.sigma_e0).collect();
    let sigma_e0_mean =
        mean(&scales).ok_or_else(|| AppError::new(3, "No measurements to fit."))?;

    let conductivity_curve = curve
        .carrier_integral
        .iter()
        .map(|&f| sigma_e0_mean * prefactor * f)
        .collect();

    info!(
        "{}: mean sigma_E0 = {sigma_e0_mean:.4e} S/m over {} point(s)",
        mechanism.display_name(),
        matches.len()
    );

    Ok(MechanismFit {
        mechanism,
        seebeck_curve: curve.seebeck.clone(),
        matches,
        sigma_e0_mean,
        conductivity_curve,
    })
}

/// Fit all mechanisms, in `ScatteringMechanism::ALL` order.
pub fn fit_all(grid: &ReducedFermiGrid, measurements: &[Measurement]) -> Result<Vec<MechanismFit>, AppError> {
    ScatteringMechanism::ALL
        .iter()
        .map(|&mechanism| {
            let curve = mechanism_curve(mechanism, grid)?;
            fit_mechanism(&curve, grid, measurements)
        })
        .collect()
}
