//! Fitting orchestration.
//!
//! Responsibilities:
//!
//! - build the reduced Fermi-level grid (`grid`)
//! - nearest-match each measurement against each mechanism's Seebeck curve,
//!   back out `σE0`, average it, and re-synthesize the conductivity curve
//!   (`fitter`)

pub mod fitter;
pub mod grid;

pub use fitter::*;
pub use grid::*;
