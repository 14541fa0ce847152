//! ASCII log-log plotting for terminal output.
//!
//! This is a fixed-size character grid, optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - measured points: `o` (conductivity vs |Seebeck|)
//! - theoretical curves: one glyph per mechanism (`#`, `+`, `*`)
//!
//! Axes use fixed limits; anything outside them is clipped, not rescaled.

use crate::domain::{CurveFile, FitRun, PlotBounds, ScatteringMechanism};

const DATA_GLYPH: char = 'o';

/// One theoretical curve to draw.
#[derive(Debug, Clone)]
pub struct PlotCurve {
    pub glyph: char,
    pub label: String,
    /// `(σ, S)` pairs.
    pub points: Vec<(f64, f64)>,
}

/// Glyph used for a mechanism's curve.
pub fn mechanism_glyph(mechanism: ScatteringMechanism) -> char {
    match mechanism {
        ScatteringMechanism::AcousticPhonon => '#',
        ScatteringMechanism::PolarOptical => '+',
        ScatteringMechanism::IonizedImpurity => '*',
    }
}

/// Render a plot for an in-memory fit run.
pub fn render_run_plot(run: &FitRun, bounds: PlotBounds, width: usize, height: usize) -> String {
    let data: Vec<(f64, f64)> = run
        .measurements
        .iter()
        .map(|m| (m.conductivity, m.seebeck.abs()))
        .collect();
    let curves: Vec<PlotCurve> = run
        .fits
        .iter()
        .map(|fit| PlotCurve {
            glyph: mechanism_glyph(fit.mechanism),
            label: fit.mechanism.key().to_string(),
            points: fit.curve_points(),
        })
        .collect();

    render_loglog_plot(&data, &curves, bounds, width, height)
}

/// Render a plot from a saved run JSON file.
pub fn render_curve_file_plot(file: &CurveFile, width: usize, height: usize) -> String {
    let data: Vec<(f64, f64)> = file
        .measurements
        .iter()
        .map(|m| (m.conductivity, m.seebeck.abs()))
        .collect();
    let curves: Vec<PlotCurve> = file
        .mechanisms
        .iter()
        .map(|record| PlotCurve {
            glyph: mechanism_glyph(record.mechanism),
            label: record.mechanism.key().to_string(),
            points: record
                .curve
                .conductivity
                .iter()
                .copied()
                .zip(record.curve.seebeck.iter().copied())
                .collect(),
        })
        .collect();

    render_loglog_plot(&data, &curves, file.bounds, width, height)
}

/// Render data points and curves on fixed log-log axes.
pub fn render_loglog_plot(
    data: &[(f64, f64)],
    curves: &[PlotCurve],
    bounds: PlotBounds,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let axes = LogAxes::new(bounds, width, height);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so data points overlay them.
    for curve in curves {
        draw_curve(&mut grid, &axes, &curve.points, curve.glyph);
    }
    for &(x, y) in data {
        if let Some((cx, cy)) = axes.cell(x, y) {
            grid[cy][cx] = DATA_GLYPH;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: sigma=[{:.1e}, {:.1e}] S/m | |S|=[{:.1e}, {:.1e}] uV/K (log-log)\n",
        bounds.sigma[0], bounds.sigma[1], bounds.seebeck[0], bounds.seebeck[1]
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!("Legend: {DATA_GLYPH} data"));
    for curve in curves {
        out.push_str(&format!(" | {} {}", curve.glyph, curve.label));
    }
    out.push('\n');

    out
}

/// Maps positive data coordinates onto grid cells through `ln`.
struct LogAxes {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    width: usize,
    height: usize,
}

impl LogAxes {
    fn new(bounds: PlotBounds, width: usize, height: usize) -> Self {
        Self {
            x0: bounds.sigma[0],
            x1: bounds.sigma[1],
            y0: bounds.seebeck[0],
            y1: bounds.seebeck[1],
            width,
            height,
        }
    }

    /// Grid cell for `(x, y)`, or `None` when the point falls outside the axes.
    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return None;
        }
        let u = log_fraction(x, self.x0, self.x1);
        let v = log_fraction(y, self.y0, self.y1);
        let cx = (u * (self.width as f64 - 1.0)).round() as usize;
        // y=top is max -> row 0
        let cy = (self.height as f64 - 1.0 - v * (self.height as f64 - 1.0)).round() as usize;
        Some((cx.min(self.width - 1), cy.min(self.height - 1)))
    }
}

fn log_fraction(v: f64, lo: f64, hi: f64) -> f64 {
    ((v.ln() - lo.ln()) / (hi.ln() - lo.ln())).clamp(0.0, 1.0)
}

fn draw_curve(grid: &mut [Vec<char>], axes: &LogAxes, curve: &[(f64, f64)], glyph: char) {
    let mut prev: Option<(usize, usize)> = None;
    for &(x, y) in curve {
        match axes.cell(x, y) {
            Some((cx, cy)) => {
                match prev {
                    Some((px, py)) => draw_line(grid, px, py, cx, cy, glyph),
                    None => put(grid, cx, cy, glyph),
                }
                prev = Some((cx, cy));
            }
            // Leaving the axes breaks the line.
            None => prev = None,
        }
    }
}

fn put(grid: &mut [Vec<char>], x: usize, y: usize, glyph: char) {
    if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
        if *cell == ' ' {
            *cell = glyph;
        }
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, glyph: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x0 >= 0 && y0 >= 0 {
            put(grid, x0 as usize, y0 as usize, glyph);
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> PlotBounds {
        PlotBounds {
            sigma: [1.0, 1e4],
            seebeck: [1.0, 1e4],
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let data = [(1e4, 1e4), (1.0, 1.0), (1e5, 10.0)];
        let curves = [PlotCurve {
            glyph: '#',
            label: "flat".to_string(),
            points: vec![(1.0, 100.0), (1e4, 100.0)],
        }];

        let txt = render_loglog_plot(&data, &curves, unit_bounds(), 10, 5);
        let expected = concat!(
            "Plot: sigma=[1.0e0, 1.0e4] S/m | |S|=[1.0e0, 1.0e4] uV/K (log-log)\n",
            "         o\n",
            "          \n",
            "##########\n",
            "          \n",
            "o         \n",
            "Legend: o data | # flat\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn out_of_range_points_are_clipped() {
        let axes = LogAxes::new(unit_bounds(), 10, 5);
        assert_eq!(axes.cell(0.5, 10.0), None);
        assert_eq!(axes.cell(10.0, 2e4), None);
        assert_eq!(axes.cell(-1.0, 10.0), None);
        assert_eq!(axes.cell(f64::NAN, 10.0), None);
        assert!(axes.cell(10.0, 10.0).is_some());
    }

    #[test]
    fn earlier_curves_keep_their_cells() {
        let curves = [
            PlotCurve { glyph: '#', label: "a".into(), points: vec![(1.0, 100.0), (1e4, 100.0)] },
            PlotCurve { glyph: '+', label: "b".into(), points: vec![(1.0, 100.0), (1e4, 100.0)] },
        ];
        let txt = render_loglog_plot(&[], &curves, unit_bounds(), 10, 5);
        assert!(txt.contains("##########"));
        assert!(!txt.lines().nth(3).unwrap().contains('+'));
    }
}
