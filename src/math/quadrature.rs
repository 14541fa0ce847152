//! Gauss–Legendre quadrature.
//!
//! Nodes and weights are computed once by Newton iteration on the Legendre
//! polynomial `P_n` and cached for the lifetime of the process. An `n`-point
//! rule integrates polynomials up to degree `2n - 1` exactly, which is what the
//! composite Fermi–Dirac evaluation relies on.

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Number of nodes in the shared rule.
pub const DEFAULT_NODES: usize = 20;

/// Maximum Newton steps per root (convergence is quadratic, this is a backstop).
const MAX_NEWTON_STEPS: usize = 100;

/// An `n`-point Gauss–Legendre rule on `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Build an `n`-point rule (`n >= 1`).
    pub fn new(n: usize) -> Self {
        let n = n.max(1);
        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];

        // Roots are symmetric, so only the upper half is solved for.
        for i in 0..n.div_ceil(2) {
            let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            let mut dp = 1.0;
            for _ in 0..MAX_NEWTON_STEPS {
                let (p_n, p_prev) = legendre_pair(n, z);
                dp = n as f64 * (z * p_n - p_prev) / (z * z - 1.0);
                let step = p_n / dp;
                z -= step;
                if step.abs() < 1e-15 {
                    break;
                }
            }

            let w = 2.0 / ((1.0 - z * z) * dp * dp);
            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        Self { nodes, weights }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Integrate `f` over `[a, b]`.
    pub fn integrate<F>(&self, a: f64, b: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(mid + half * x))
            .sum();
        sum * half
    }
}

/// The process-wide rule used by the Fermi–Dirac integrals.
pub fn shared_rule() -> &'static GaussLegendre {
    static RULE: OnceLock<GaussLegendre> = OnceLock::new();
    RULE.get_or_init(|| GaussLegendre::new(DEFAULT_NODES))
}

/// Evaluate `(P_n(z), P_{n-1}(z))` by the three-term recurrence.
fn legendre_pair(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        let j = j as f64;
        p1 = ((2.0 * j - 1.0) * z * p2 - (j - 1.0) * p3) / j;
    }
    (p1, p2)
}
