//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the measurement table
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::SampleConfig;
use crate::domain::{DEFAULT_DATA_FILE, FitConfig, PlotBounds};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sfit` binary.
pub fn run() -> Result<(), AppError> {
    // `sfit` and `sfit -f data.csv` behave like `sfit tui ...`. Clap requires a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Tui(args) => handle_tui(args),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_matches(&run));

    if config.plot {
        let plot = crate::plot::render_run_plot(
            &run,
            config.bounds,
            config.plot_width,
            config.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run)?;
        info!("wrote matches to {}", path.display());
    }
    if let Some(path) = &config.export_curves {
        crate::io::write_curve_json(path, &run, &config)?;
        info!("wrote run JSON to {}", path.display());
    }

    Ok(())
}

fn handle_tui(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::read_curve_json(&args.curves)?;
    let plot = crate::plot::render_curve_file_plot(&file, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        mechanism: args.mechanism,
        sigma_e0: args.sigma_e0,
        eta_min: args.eta_min,
        eta_max: args.eta_max,
        count: args.count,
        seed: args.seed,
        noise: args.noise,
        negative: args.negative,
    };
    let measurements = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&args.out, &measurements)?;
    println!(
        "Wrote {} measurement(s) ({}) to {}",
        measurements.len(),
        config.mechanism.display_name(),
        args.out.display()
    );
    Ok(())
}

/// Build a validated `FitConfig` from CLI flags.
pub fn fit_config_from_args(args: &FitArgs) -> Result<FitConfig, AppError> {
    let delimiter = delimiter_byte(args.delimiter)?;
    let config = FitConfig {
        data_path: resolve_data_path(args.data.as_deref(), delimiter)?,
        delimiter,
        efs: args.efs,
        efe: args.efe,
        npts: args.npts,
        temperature: args.temperature,
        bounds: PlotBounds {
            sigma: [args.sigma_min, args.sigma_max],
            seebeck: [args.seebeck_min, args.seebeck_max],
        },
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_results: args.export.clone(),
        export_curves: args.export_curves.clone(),
    };
    pipeline::validate_config(&config)?;
    Ok(config)
}

fn delimiter_byte(delimiter: char) -> Result<u8, AppError> {
    u8::try_from(delimiter)
        .ok()
        .filter(|b| b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"')
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Unsupported delimiter {delimiter:?}: use a single ASCII punctuation or whitespace character."),
            )
        })
}

/// Explicit path > default file in the working directory > interactive picker.
fn resolve_data_path(explicit: Option<&std::path::Path>, delimiter: u8) -> Result<PathBuf, AppError> {
    if let Some(path) = explicit {
        return crate::cli::picker::validate_table_path(path);
    }

    let default = PathBuf::from(DEFAULT_DATA_FILE);
    if default.is_file() {
        return Ok(default);
    }

    if std::io::stdin().is_terminal() {
        println!("{DEFAULT_DATA_FILE} not found in the working directory.");
        return crate::cli::picker::prompt_for_table_path(delimiter);
    }

    Err(AppError::new(
        2,
        format!("{DEFAULT_DATA_FILE} not found. Provide a data path with -f <file.csv> or SFIT_DATA."),
    ))
}

/// Rewrite argv so `sfit` defaults to `sfit tui`.
///
/// Rules:
/// - `sfit`                      -> `sfit tui`
/// - `sfit -f data.csv ...`      -> `sfit tui -f data.csv ...`
/// - `sfit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "tui" | "plot" | "sample");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["sfit"])), args(&["sfit", "tui"]));
        assert_eq!(
            rewrite_args(args(&["sfit", "-f", "a.csv"])),
            args(&["sfit", "tui", "-f", "a.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        for argv in [
            args(&["sfit", "fit", "--npts", "10"]),
            args(&["sfit", "sample", "-o", "x.csv"]),
            args(&["sfit", "--help"]),
            args(&["sfit", "-V"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn delimiters() {
        assert_eq!(delimiter_byte(',').unwrap(), b',');
        assert_eq!(delimiter_byte(';').unwrap(), b';');
        assert_eq!(delimiter_byte('\t').unwrap(), b'\t');
        assert_eq!(delimiter_byte('a').unwrap_err().exit_code(), 2);
        assert_eq!(delimiter_byte('é').unwrap_err().exit_code(), 2);
    }

    #[test]
    fn config_from_explicit_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "Conductivity,Seebeck\n1e5,150\n").unwrap();

        let cli = crate::cli::Cli::try_parse_from([
            "sfit",
            "fit",
            "-f",
            path.to_str().unwrap(),
            "--npts",
            "50",
            "--no-plot",
        ])
        .unwrap();
        let Command::Fit(fit_args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&fit_args).unwrap();
        assert_eq!(config.data_path, path);
        assert_eq!(config.npts, 50);
        assert!(!config.plot);
        assert_eq!(config.bounds, PlotBounds::default());
    }

    #[test]
    fn inverted_plot_limits_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.csv");
        std::fs::write(&path, "Conductivity,Seebeck\n1e5,150\n").unwrap();

        let cli = crate::cli::Cli::try_parse_from([
            "sfit",
            "fit",
            "-f",
            path.to_str().unwrap(),
            "--sigma-min",
            "1e8",
        ])
        .unwrap();
        let Command::Fit(fit_args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(fit_config_from_args(&fit_args).unwrap_err().exit_code(), 2);
    }
}
