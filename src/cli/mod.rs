//! Command-line parsing for the scattering-mechanism fitter.
//!
//! Argument parsing and command dispatch stay separate from the modeling/math
//! code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::ScatteringMechanism;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sfit",
    version,
    about = "Fit Seebeck/conductivity data to single-band scattering models"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit the data, print a summary and an ASCII log-log plot, and optionally export.
    Fit(FitArgs),
    /// Launch the interactive chart.
    ///
    /// Uses the same fit pipeline as `sfit fit`, rendered with Ratatui + Plotters.
    Tui(FitArgs),
    /// Plot a previously exported run JSON.
    Plot(PlotArgs),
    /// Write a synthetic measurement table generated from one mechanism.
    Sample(SampleArgs),
}

/// Common options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Measurement table with `Conductivity` (S/m) and `Seebeck` (µV/K) columns.
    ///
    /// Defaults to `Co_2009.csv` in the working directory; when that is missing
    /// an interactive picker lists the tables found.
    #[arg(short = 'f', long = "data", value_name = "CSV", env = "SFIT_DATA")]
    pub data: Option<PathBuf>,

    /// Column delimiter of the measurement table.
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Start of the reduced Fermi-level sweep.
    #[arg(long, default_value_t = -8.0, allow_hyphen_values = true)]
    pub efs: f64,

    /// End of the reduced Fermi-level sweep.
    #[arg(long, default_value_t = 90.0, allow_hyphen_values = true)]
    pub efe: f64,

    /// Number of grid points between `--efs` and `--efe`.
    #[arg(long, default_value_t = 10_000)]
    pub npts: usize,

    /// Measurement temperature in K (recorded with the run; not used by the model).
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Lower conductivity limit of the plot (S/m).
    #[arg(long, default_value_t = 1e3)]
    pub sigma_min: f64,

    /// Upper conductivity limit of the plot (S/m).
    #[arg(long, default_value_t = 1e7)]
    pub sigma_max: f64,

    /// Lower |Seebeck| limit of the plot (µV/K).
    #[arg(long, default_value_t = 10.0)]
    pub seebeck_min: f64,

    /// Upper |Seebeck| limit of the plot (µV/K).
    #[arg(long, default_value_t = 1000.0)]
    pub seebeck_max: f64,

    /// Disable the terminal plot (`fit` only).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,

    /// Export per-measurement matches to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the run (settings, matches, decimated curves) to JSON.
    #[arg(long = "export-curves")]
    pub export_curves: Option<PathBuf>,
}

/// Options for plotting a saved run.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Run JSON file produced by `sfit fit --export-curves`.
    #[arg(long, value_name = "JSON")]
    pub curves: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 30)]
    pub height: usize,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Mechanism the sample is generated from.
    #[arg(long, value_enum, default_value_t = ScatteringMechanism::AcousticPhonon)]
    pub mechanism: ScatteringMechanism,

    /// Conductivity scale σE0 (S/m).
    #[arg(long = "sigma-e0", default_value_t = 1e4)]
    pub sigma_e0: f64,

    /// Lowest reduced Fermi level.
    #[arg(long, default_value_t = -2.0, allow_hyphen_values = true)]
    pub eta_min: f64,

    /// Highest reduced Fermi level.
    #[arg(long, default_value_t = 8.0, allow_hyphen_values = true)]
    pub eta_max: f64,

    /// Number of measurements.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub count: usize,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Relative (log-normal) noise on conductivity.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Write negative Seebeck values (n-type).
    #[arg(long)]
    pub negative: bool,

    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::try_parse_from(["sfit", "fit"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.efs, -8.0);
        assert_eq!(args.efe, 90.0);
        assert_eq!(args.npts, 10_000);
        assert_eq!(args.temperature, 300.0);
        assert_eq!(args.delimiter, ',');
    }

    #[test]
    fn negative_sweep_bounds_parse() {
        let cli = Cli::try_parse_from(["sfit", "fit", "--efs", "-12.5", "--efe", "-1", "--npts", "1"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.efs, -12.5);
        assert_eq!(args.efe, -1.0);
        assert_eq!(args.npts, 1);
    }

    #[test]
    fn sample_mechanism_names() {
        let cli = Cli::try_parse_from(["sfit", "sample", "--mechanism", "impurity", "-o", "x.csv"]).unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.mechanism, ScatteringMechanism::IonizedImpurity);
        assert_eq!(args.out, PathBuf::from("x.csv"));
    }
}
