//! Complete Fermi–Dirac integrals.
//!
//! We use the unnormalized definition
//!
//! ```text
//! F_k(η) = ∫_0^∞ x^k / (1 + exp(x - η)) dx,   k >= 0
//! ```
//!
//! (no `1/Γ(k+1)` prefactor), which is the form the transport expressions in
//! `models::transport` are written against.
//!
//! Evaluation:
//! - `k = 0` uses the closed form `ln(1 + e^η)`.
//! - Any other order uses composite Gauss–Legendre quadrature over
//!   `[0, max(η, 0) + TAIL]` in fixed-width panels. The occupation factor is
//!   analytic with poles at `x = η ± iπ`, so a 20-point rule per 2-wide panel
//!   converges to machine precision.
//! - On the first panel we substitute `x = u²` so fractional orders do not
//!   see an unbounded derivative at `x = 0`.

use crate::error::AppError;
use crate::math::quadrature::shared_rule;

/// Integration window beyond `max(η, 0)`. The neglected tail is `~e^-TAIL`
/// relative to the integral.
const TAIL: f64 = 60.0;

/// Panel width for the composite rule.
const PANEL_WIDTH: f64 = 2.0;

/// Evaluate `F_k(η)`.
///
/// Errors (exit code 4) when the order is negative or non-finite, or when `η`
/// is not finite.
pub fn fermi_dirac(order: f64, eta: f64) -> Result<f64, AppError> {
    if !(order.is_finite() && order >= 0.0) {
        return Err(AppError::new(
            4,
            format!("Fermi-Dirac order must be finite and >= 0 (got {order})."),
        ));
    }
    if !eta.is_finite() {
        return Err(AppError::new(
            4,
            format!("Reduced Fermi level must be finite (got {eta})."),
        ));
    }

    if order == 0.0 {
        return Ok(softplus(eta));
    }
    Ok(fermi_dirac_quadrature(order, eta))
}

/// Evaluate `F_k(η)` for an integer scattering order.
pub fn fermi_dirac_int(order: u32, eta: f64) -> Result<f64, AppError> {
    fermi_dirac(f64::from(order), eta)
}

/// `ln(1 + e^η)` without overflow for large `η`.
fn softplus(eta: f64) -> f64 {
    if eta > 0.0 {
        eta + (-eta).exp().ln_1p()
    } else {
        eta.exp().ln_1p()
    }
}

/// Quadrature path for any `k >= 0`. Inputs are assumed validated.
pub(crate) fn fermi_dirac_quadrature(order: f64, eta: f64) -> f64 {
    let rule = shared_rule();
    let upper = eta.max(0.0) + TAIL;
    let panels = (upper / PANEL_WIDTH).ceil() as usize;

    // First panel with x = u², dx = 2u du.
    let first_end = PANEL_WIDTH.min(upper);
    let mut total = rule.integrate(0.0, first_end.sqrt(), |u| {
        let x = u * u;
        2.0 * u * power(x, order) * occupation(x - eta)
    });

    for p in 1..panels {
        let a = p as f64 * PANEL_WIDTH;
        let b = (a + PANEL_WIDTH).min(upper);
        if b <= a {
            break;
        }
        total += rule.integrate(a, b, |x| power(x, order) * occupation(x - eta));
    }

    total
}

/// `1 / (1 + e^t)` evaluated on the side that cannot overflow.
fn occupation(t: f64) -> f64 {
    if t > 0.0 {
        let e = (-t).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + t.exp())
    }
}

fn power(x: f64, order: f64) -> f64 {
    if order.fract() == 0.0 && order <= i32::MAX as f64 {
        x.powi(order as i32)
    } else {
        x.powf(order)
    }
}
