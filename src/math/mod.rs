//! Numerical building blocks: Gauss–Legendre quadrature and Fermi–Dirac integrals.

pub mod fermi_dirac;
pub mod quadrature;

pub use fermi_dirac::*;
pub use quadrature::*;
