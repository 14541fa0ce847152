use crate::domain::{FitConfig, FitRun, MechanismFit, ScatteringMechanism};

/// Format the run summary (dataset + grid + per-mechanism averages).
pub fn format_run_summary(run: &FitRun, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== sfit - single-band scattering fit ===\n");
    out.push_str(&format!(
        "Data: {} (n={})\n",
        config.data_path.display(),
        run.measurements.len()
    ));
    out.push_str(&format!(
        "Grid: eta=[{:.2}, {:.2}] | npts={} | step={}\n",
        run.grid.start,
        run.grid.end,
        run.grid.len(),
        fmt_step(run),
    ));
    out.push_str(&format!("Temperature: {:.1} K (metadata only)\n", config.temperature));

    out.push_str("\nMechanisms:\n");
    out.push_str(
        format!(
            "{:<24} {:>3} {:>16} {:>18}\n",
            "mechanism", "l", "sigma_E0 (S/m)", "eta range"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<3} {:-<16} {:-<18}\n", "", "", "", "").trim_end());
    out.push('\n');
    for fit in &run.fits {
        out.push_str(
            format!(
                "{:<24} {:>3} {:>16.4e} {:>18}\n",
                fit.mechanism.display_name(),
                fit.mechanism.exponent(),
                fit.sigma_e0_mean,
                fmt_eta_range(fit),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push('\n');

    out
}

/// Format the per-measurement match table (one column of `η` per mechanism).
pub fn format_matches(run: &FitRun) -> String {
    let mut out = String::new();

    out.push_str("Matched reduced Fermi levels:\n");
    let mut header = format!("{:>4} {:>12} {:>10}", "#", "sigma (S/m)", "S (uV/K)");
    let mut rule = format!("{:->4} {:->12} {:->10}", "", "", "");
    for mechanism in ScatteringMechanism::ALL {
        header.push_str(&format!(" {:>10}", format!("eta(l={})", mechanism.exponent())));
        rule.push_str(&format!(" {:->10}", ""));
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');

    for (j, m) in run.measurements.iter().enumerate() {
        let mut line = format!("{:>4} {:>12.4e} {:>10.2}", j + 1, m.conductivity, m.seebeck);
        for fit in &run.fits {
            match fit.matches.get(j) {
                Some(p) => line.push_str(&format!(" {:>10.3}", p.reduced_fermi)),
                None => line.push_str(&format!(" {:>10}", "-")),
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn fmt_step(run: &FitRun) -> String {
    if run.grid.len() < 2 {
        return "-".to_string();
    }
    format!("{:.4}", (run.grid.end - run.grid.start) / (run.grid.len() as f64 - 1.0))
}

fn fmt_eta_range(fit: &MechanismFit) -> String {
    let lo = fit.matches.iter().map(|p| p.reduced_fermi).fold(f64::INFINITY, f64::min);
    let hi = fit.matches.iter().map(|p| p.reduced_fermi).fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() {
        format!("[{lo:.2}, {hi:.2}]")
    } else {
        "-".to_string()
    }
}
