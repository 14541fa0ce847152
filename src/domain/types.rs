//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Boltzmann constant (J/K).
pub const BOLTZMANN: f64 = 1.380_648_52e-23;

/// Elementary charge (C), as used by the reference analysis (rounded).
pub const ELECTRON_CHARGE: f64 = 1.6e-19;

/// `kB / e` in µV/K.
pub const KB_OVER_E_UV: f64 = 1e6 * BOLTZMANN / ELECTRON_CHARGE;

/// Single-band scattering mechanism, identified by its energy exponent `l`
/// (relaxation time `τ ∝ E^(l - 1/2)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScatteringMechanism {
    /// Acoustic phonon, point defect and non-polar optical scattering (`l = 0`).
    #[value(name = "acoustic")]
    AcousticPhonon,
    /// Polar optical scattering (`l = 1`).
    #[value(name = "polar")]
    PolarOptical,
    /// Ionized impurity scattering (`l = 2`).
    #[value(name = "impurity")]
    IonizedImpurity,
}

impl ScatteringMechanism {
    pub const ALL: [ScatteringMechanism; 3] = [
        ScatteringMechanism::AcousticPhonon,
        ScatteringMechanism::PolarOptical,
        ScatteringMechanism::IonizedImpurity,
    ];

    /// Scattering exponent `l`.
    pub fn exponent(self) -> u32 {
        match self {
            ScatteringMechanism::AcousticPhonon => 0,
            ScatteringMechanism::PolarOptical => 1,
            ScatteringMechanism::IonizedImpurity => 2,
        }
    }

    /// Multiplicative constant in front of `F_l` in the conductivity (`l + 1`).
    pub fn prefactor(self) -> f64 {
        f64::from(self.exponent() + 1)
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ScatteringMechanism::AcousticPhonon => "Acoustic/PD/NPO (l=0)",
            ScatteringMechanism::PolarOptical => "Polar optical (l=1)",
            ScatteringMechanism::IonizedImpurity => "Ionized impurity (l=2)",
        }
    }

    /// Short identifier for exports.
    pub fn key(self) -> &'static str {
        match self {
            ScatteringMechanism::AcousticPhonon => "acoustic",
            ScatteringMechanism::PolarOptical => "polar",
            ScatteringMechanism::IonizedImpurity => "impurity",
        }
    }

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self.exponent() as usize
    }
}

/// One measured (conductivity, Seebeck) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Electrical conductivity in S/m.
    pub conductivity: f64,
    /// Seebeck coefficient in µV/K (sign kept as measured).
    pub seebeck: f64,
}

/// Evenly spaced reduced Fermi levels `η = E_F / kT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedFermiGrid {
    pub start: f64,
    pub end: f64,
    pub values: Vec<f64>,
}

impl ReducedFermiGrid {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Theoretical Seebeck curve for one mechanism, plus the `F_l(η)` values it
/// was built from (reused for the conductivity back-out and re-synthesis).
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismCurve {
    pub mechanism: ScatteringMechanism,
    /// `S(η_i)` in µV/K.
    pub seebeck: Vec<f64>,
    /// `F_l(η_i)`.
    pub carrier_integral: Vec<f64>,
}

/// Nearest-grid-point match of one measurement against one mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMatch {
    pub grid_index: usize,
    pub reduced_fermi: f64,
    /// Conductivity scale `σE0` backed out of this measurement (S/m).
    pub sigma_e0: f64,
}

/// Full fit output for one mechanism.
#[derive(Debug, Clone)]
pub struct MechanismFit {
    pub mechanism: ScatteringMechanism,
    /// `S(η_i)` in µV/K, one per grid point.
    pub seebeck_curve: Vec<f64>,
    /// One per measurement, in table order.
    pub matches: Vec<PointMatch>,
    /// Mean of `matches[..].sigma_e0`.
    pub sigma_e0_mean: f64,
    /// `σ(η_i) = σE0 · (l+1) · F_l(η_i)` in S/m, one per grid point.
    pub conductivity_curve: Vec<f64>,
}

impl MechanismFit {
    /// `(σ, S)` pairs of the theoretical curve.
    pub fn curve_points(&self) -> Vec<(f64, f64)> {
        self.conductivity_curve
            .iter()
            .copied()
            .zip(self.seebeck_curve.iter().copied())
            .collect()
    }
}

/// Everything a single run computes.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub grid: ReducedFermiGrid,
    pub measurements: Vec<Measurement>,
    /// In `ScatteringMechanism::ALL` order.
    pub fits: Vec<MechanismFit>,
}

/// Fixed log-log plot window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotBounds {
    /// Conductivity range (S/m).
    pub sigma: [f64; 2],
    /// |Seebeck| range (µV/K).
    pub seebeck: [f64; 2],
}

impl Default for PlotBounds {
    fn default() -> Self {
        Self {
            sigma: [1e3, 1e7],
            seebeck: [10.0, 1000.0],
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub data_path: PathBuf,
    pub delimiter: u8,

    /// Start of the reduced Fermi-level sweep.
    pub efs: f64,
    /// End of the reduced Fermi-level sweep.
    pub efe: f64,
    /// Number of grid points.
    pub npts: usize,

    /// Measurement temperature (K). Carried as run metadata; the transport
    /// expressions are written in reduced units and do not use it.
    pub temperature: f64,

    pub bounds: PlotBounds,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curves: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            delimiter: b',',
            efs: -8.0,
            efe: 90.0,
            npts: 10_000,
            temperature: 300.0,
            bounds: PlotBounds::default(),
            plot: true,
            plot_width: 100,
            plot_height: 30,
            export_results: None,
            export_curves: None,
        }
    }
}

/// Data file looked up in the working directory when none is given.
pub const DEFAULT_DATA_FILE: &str = "Co_2009.csv";

/// A saved run (JSON), written by `sfit fit --export-curves`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: String,
    pub efs: f64,
    pub efe: f64,
    pub npts: usize,
    pub temperature: f64,
    pub bounds: PlotBounds,
    pub measurements: Vec<Measurement>,
    pub mechanisms: Vec<MechanismRecord>,
}

/// Per-mechanism section of a `CurveFile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanismRecord {
    pub mechanism: ScatteringMechanism,
    pub exponent: u32,
    pub sigma_e0_mean: f64,
    pub matches: Vec<PointMatch>,
    pub curve: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub reduced_fermi: Vec<f64>,
    pub conductivity: Vec<f64>,
    pub seebeck: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mechanisms_cover_exponents_in_order() {
        let exps: Vec<u32> = ScatteringMechanism::ALL.iter().map(|m| m.exponent()).collect();
        assert_eq!(exps, vec![0, 1, 2]);
        let pre: Vec<f64> = ScatteringMechanism::ALL.iter().map(|m| m.prefactor()).collect();
        assert_eq!(pre, vec![1.0, 2.0, 3.0]);
        for (i, m) in ScatteringMechanism::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }

    #[test]
    fn kb_over_e_in_microvolts() {
        assert!((KB_OVER_E_UV - 86.29).abs() < 0.01);
    }
}
