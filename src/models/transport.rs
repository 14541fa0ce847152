//! Seebeck coefficient and conductivity for a single parabolic band.
//!
//! With scattering exponent `l` and reduced Fermi level `η`:
//!
//! ```text
//! S(η) = (kB/e) · [ (l+2)·F_{l+1}(η) / ((l+1)·F_l(η)) − η ]
//! σ(η) = σE0 · (l+1) · F_l(η)
//! ```
//!
//! `S` is returned in µV/K and `σ` in the units of `σE0`.

use rayon::prelude::*;

use crate::domain::{KB_OVER_E_UV, MechanismCurve, ReducedFermiGrid, ScatteringMechanism};
use crate::error::AppError;
use crate::math::fermi_dirac_int;

/// Seebeck coefficient (µV/K) at reduced Fermi level `eta`.
pub fn seebeck(mechanism: ScatteringMechanism, eta: f64) -> Result<f64, AppError> {
    seebeck_with_integral(mechanism, eta).map(|(s, _)| s)
}

/// Conductivity at reduced Fermi level `eta` for a given `σE0`.
pub fn conductivity(mechanism: ScatteringMechanism, sigma_e0: f64, eta: f64) -> Result<f64, AppError> {
    Ok(sigma_e0 * mechanism.prefactor() * fermi_dirac_int(mechanism.exponent(), eta)?)
}

/// Evaluate the theoretical Seebeck curve over the whole grid.
///
/// Grid points are evaluated in parallel; results keep grid order, so the
/// output is bit-identical across runs for the same inputs.
pub fn mechanism_curve(
    mechanism: ScatteringMechanism,
    grid: &ReducedFermiGrid,
) -> Result<MechanismCurve, AppError> {
    let pairs = grid
        .values
        .par_iter()
        .map(|&eta| seebeck_with_integral(mechanism, eta))
        .collect::<Result<Vec<_>, AppError>>()?;

    let (seebeck, carrier_integral): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    Ok(MechanismCurve {
        mechanism,
        seebeck,
        carrier_integral,
    })
}

/// Returns `(S(η), F_l(η))`.
fn seebeck_with_integral(mechanism: ScatteringMechanism, eta: f64) -> Result<(f64, f64), AppError> {
    let l = mechanism.exponent();
    let lower = fermi_dirac_int(l, eta)?;
    let upper = fermi_dirac_int(l + 1, eta)?;

    let lf = f64::from(l);
    let s = KB_OVER_E_UV * ((lf + 2.0) * upper / ((lf + 1.0) * lower) - eta);
    if !s.is_finite() {
        return Err(AppError::new(
            4,
            format!(
                "Non-finite Seebeck coefficient for {} at eta={eta}.",
                mechanism.display_name()
            ),
        ));
    }
    Ok((s, lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::linspace_grid;
    use std::f64::consts::PI;

    #[test]
    fn acoustic_seebeck_strictly_decreases() {
        let grid = linspace_grid(-8.0, 90.0, 500).unwrap();
        let curve = mechanism_curve(ScatteringMechanism::AcousticPhonon, &grid).unwrap();
        for (i, pair) in curve.seebeck.windows(2).enumerate() {
            assert!(pair[1] < pair[0], "not decreasing at {i}: {} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn curve_generation_is_bit_identical() {
        let grid = linspace_grid(-8.0, 90.0, 300).unwrap();
        for mechanism in ScatteringMechanism::ALL {
            let a = mechanism_curve(mechanism, &grid).unwrap();
            let b = mechanism_curve(mechanism, &grid).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.seebeck.len(), grid.len());
            assert_eq!(a.carrier_integral.len(), grid.len());
        }
    }

    #[test]
    fn non_degenerate_limit() {
        // S -> (kB/e)(l + 2 - η) for η << 0.
        let eta = -20.0;
        for mechanism in ScatteringMechanism::ALL {
            let l = f64::from(mechanism.exponent());
            let s = seebeck(mechanism, eta).unwrap();
            let expected = KB_OVER_E_UV * (l + 2.0 - eta);
            assert!((s - expected).abs() / expected < 1e-6, "{mechanism:?}: {s} vs {expected}");
        }
    }

    #[test]
    fn degenerate_limit() {
        // S -> (π²/3)(kB/e)(l + 1)/η for η >> 0.
        let eta = 80.0;
        for mechanism in ScatteringMechanism::ALL {
            let l = f64::from(mechanism.exponent());
            let s = seebeck(mechanism, eta).unwrap();
            let expected = PI * PI / 3.0 * KB_OVER_E_UV * (l + 1.0) / eta;
            assert!((s - expected).abs() / expected < 1e-2, "{mechanism:?}: {s} vs {expected}");
        }
    }

    #[test]
    fn higher_exponent_gives_larger_seebeck() {
        let eta = 2.0;
        let s0 = seebeck(ScatteringMechanism::AcousticPhonon, eta).unwrap();
        let s1 = seebeck(ScatteringMechanism::PolarOptical, eta).unwrap();
        let s2 = seebeck(ScatteringMechanism::IonizedImpurity, eta).unwrap();
        assert!(s0 < s1 && s1 < s2);
    }

    #[test]
    fn conductivity_scales_with_prefactor() {
        let sigma = conductivity(ScatteringMechanism::IonizedImpurity, 10.0, 0.0).unwrap();
        let f2 = fermi_dirac_int(2, 0.0).unwrap();
        assert!((sigma - 30.0 * f2).abs() < 1e-12);
    }
}
