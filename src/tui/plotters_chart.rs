//! Plotters-powered log-log transport chart widget for Ratatui.
//!
//! Plotters gives us log-scaled coordinates and line styling for free; the
//! output is rendered into the Ratatui buffer via `plotters-ratatui-backend`.

use plotters::prelude::*;
// The Ratatui `Color` import below shadows the prelude's trait of the same name.
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One theoretical curve with its styling.
pub struct ChartCurve {
    /// `(σ, S)` pairs, already clipped to the chart bounds.
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub stroke: u32,
}

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call; `render()` only
/// draws.
pub struct TransportChart<'a> {
    /// Measured `(σ, |S|)` points.
    pub points: &'a [(f64, f64)],
    pub curves: &'a [ChartCurve],
    /// Conductivity bounds (S/m), both positive.
    pub x_bounds: [f64; 2],
    /// |Seebeck| bounds (µV/K), both positive.
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for TransportChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a tiny chart; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let valid = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo > 0.0 && hi > lo;
        if !valid(x0, x1) || !valid(y0, y1) {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Tick labels are drawn by the TUI itself, so no label areas here.
                .set_label_area_size(LabelAreaPosition::Left, 0)
                .set_label_area_size(LabelAreaPosition::Bottom, 0)
                .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .axis_style(&WHITE)
                .draw()?;

            for curve in self.curves {
                chart.draw_series(LineSeries::new(
                    curve.points.iter().copied(),
                    curve.color.stroke_width(curve.stroke),
                ))?;
            }

            // `Circle` radii map poorly onto the terminal canvas; a pixel per
            // measurement reads as a clean dot.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_blank_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|cell| cell.symbol() != " ").count()
    }

    #[test]
    fn renders_curves_and_points_into_buffer() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let points = [(1e4, 200.0), (1e5, 120.0)];
        let curves = [ChartCurve {
            points: vec![(1e3, 900.0), (1e5, 100.0), (1e7, 12.0)],
            color: RGBColor(70, 130, 180),
            stroke: 2,
        }];
        let chart = TransportChart {
            points: &points,
            curves: &curves,
            x_bounds: [1e3, 1e7],
            y_bounds: [10.0, 1000.0],
        };

        chart.render(area, &mut buf);
        assert!(non_blank_cells(&buf) > 0);
    }

    #[test]
    fn tiny_area_shows_hint() {
        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        let chart = TransportChart {
            points: &[],
            curves: &[],
            x_bounds: [1e3, 1e7],
            y_bounds: [10.0, 1000.0],
        };

        chart.render(area, &mut buf);
        let first_row: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with("Chart area too small"));
    }

    #[test]
    fn invalid_log_bounds_draw_nothing() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let chart = TransportChart {
            points: &[(1e4, 100.0)],
            curves: &[],
            x_bounds: [0.0, 1e7],
            y_bounds: [10.0, 1000.0],
        };

        chart.render(area, &mut buf);
        assert_eq!(non_blank_cells(&buf), 0);
    }
}
