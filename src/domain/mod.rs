//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the scattering mechanisms (`ScatteringMechanism`)
//! - measurements and the reduced Fermi-level grid
//! - fit outputs (`PointMatch`, `MechanismFit`, `FitRun`)
//! - the run configuration (`FitConfig`)

pub mod types;

pub use types::*;
