//! Ratatui-based terminal UI.
//!
//! Shows the measured points and the three theoretical curves on fixed log-log
//! axes, with a side panel of per-mechanism results. Mechanisms and the data
//! points can be toggled; `r` reloads the data file and refits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::domain::{FitConfig, FitRun, PlotBounds, ScatteringMechanism};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartCurve, TransportChart};

/// Start the TUI.
///
/// The first fit runs before the terminal switches to raw mode so load errors
/// are printed normally.
pub fn run(config: FitConfig) -> Result<(), AppError> {
    let run = crate::app::pipeline::run_fit(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, run);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: FitConfig,
    run: FitRun,
    /// Indexed by `ScatteringMechanism::index()`.
    visible: [bool; 3],
    show_points: bool,
    status: String,
}

impl App {
    fn new(config: FitConfig, run: FitRun) -> Self {
        let status = format!("Loaded {} measurement(s).", run.measurements.len());
        Self {
            config,
            run,
            visible: [true; 3],
            show_points: true,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as u8 - b'1') as usize;
                self.visible[idx] = !self.visible[idx];
                let mechanism = ScatteringMechanism::ALL[idx];
                self.status = format!(
                    "{} {}",
                    mechanism.display_name(),
                    if self.visible[idx] { "shown" } else { "hidden" }
                );
            }
            KeyCode::Char('p') => {
                self.show_points = !self.show_points;
                self.status = format!("Data points {}", if self.show_points { "shown" } else { "hidden" });
            }
            KeyCode::Char('r') => self.refit(),
            _ => {}
        }
        false
    }

    fn refit(&mut self) {
        match crate::app::pipeline::run_fit(&self.config) {
            Ok(run) => {
                self.status = format!("Reloaded {} measurement(s).", run.measurements.len());
                self.run = run;
            }
            // Keep showing the previous fit.
            Err(err) => self.status = format!("Reload failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled("sfit", Style::default().fg(Color::Cyan)),
                Span::raw(" - single-band scattering fit"),
            ]),
            Line::from(Span::styled(
                format!(
                    "data: {} | n={} | eta=[{:.2}, {:.2}] | npts={} | T={:.1} K (metadata)",
                    self.config.data_path.display(),
                    self.run.measurements.len(),
                    self.run.grid.start,
                    self.run.grid.end,
                    self.run.grid.len(),
                    self.config.temperature,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(42)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_mechanisms(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Thermopower vs conductivity").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let bounds = self.config.bounds;
        let (points, curves) = chart_series(&self.run, &self.visible, self.show_points, bounds);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = TransportChart {
            points: &points,
            curves: &curves,
            x_bounds: bounds.sigma,
            y_bounds: bounds.seebeck,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, bounds);
        }
    }

    fn draw_mechanisms(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        for fit in &self.run.fits {
            let idx = fit.mechanism.index();
            let (r, g, b) = mechanism_rgb(fit.mechanism);
            let marker = if self.visible[idx] { "■" } else { "□" };
            items.push(ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(format!("{marker} "), Style::default().fg(Color::Rgb(r, g, b))),
                    Span::styled(
                        format!("{} {}", idx + 1, fit.mechanism.display_name()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("    sigma_E0 = {:.4e} S/m", fit.sigma_e0_mean),
                    Style::default().fg(Color::Gray),
                )),
            ])));
        }

        let list = List::new(items).block(Block::default().title("Mechanisms").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1/2/3 toggle mechanism  p points  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Curve colours: steelblue, darkgreen, firebrick.
fn mechanism_rgb(mechanism: ScatteringMechanism) -> (u8, u8, u8) {
    match mechanism {
        ScatteringMechanism::AcousticPhonon => (70, 130, 180),
        ScatteringMechanism::PolarOptical => (0, 100, 0),
        ScatteringMechanism::IonizedImpurity => (178, 34, 34),
    }
}

fn mechanism_stroke(mechanism: ScatteringMechanism) -> u32 {
    match mechanism {
        ScatteringMechanism::AcousticPhonon => 2,
        _ => 1,
    }
}

/// Build chart series, keeping only points inside the (log) bounds.
fn chart_series(
    run: &FitRun,
    visible: &[bool; 3],
    show_points: bool,
    bounds: PlotBounds,
) -> (Vec<(f64, f64)>, Vec<ChartCurve>) {
    let inside = |&(x, y): &(f64, f64)| {
        x.is_finite()
            && y.is_finite()
            && (bounds.sigma[0]..=bounds.sigma[1]).contains(&x)
            && (bounds.seebeck[0]..=bounds.seebeck[1]).contains(&y)
    };

    let points = if show_points {
        run.measurements
            .iter()
            .map(|m| (m.conductivity, m.seebeck.abs()))
            .filter(inside)
            .collect()
    } else {
        Vec::new()
    };

    let curves = run
        .fits
        .iter()
        .filter(|fit| visible[fit.mechanism.index()])
        .map(|fit| {
            let (r, g, b) = mechanism_rgb(fit.mechanism);
            ChartCurve {
                points: fit.curve_points().into_iter().filter(inside).collect(),
                color: RGBColor(r, g, b),
                stroke: mechanism_stroke(fit.mechanism),
            }
        })
        .collect();

    (points, curves)
}

/// Powers of ten inside `[lo, hi]`; falls back to the endpoints when the
/// range spans less than two decades.
fn decade_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    let ticks: Vec<f64> = (first..=last).map(|p| 10f64.powi(p)).collect();
    if ticks.len() < 2 { vec![lo, hi] } else { ticks }
}

fn fmt_tick(v: f64) -> String {
    format!("{v:.0e}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(frame: &mut ratatui::Frame<'_>, inner: Rect, chart: Rect, insets: AxisInsets, bounds: PlotBounds) {
    let style = Style::default().fg(Color::Gray);
    let [x0, x1] = bounds.sigma;
    let [y0, y1] = bounds.seebeck;

    for x_val in decade_ticks(x0, x1) {
        let u = (x_val.ln() - x0.ln()) / (x1.ln() - x0.ln());
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_tick(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for y_val in decade_ticks(y0, y1) {
        let u = (y_val.ln() - y0.ln()) / (y1.ln() - y0.ln());
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_tick(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("Conductivity σ (S/m)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("Thermopower |S| (µV/K)").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: 22.min(inner.width),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
