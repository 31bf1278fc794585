use std::error::Error;
use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;

use crate::errors::SimulationError;
use crate::render::Renderer;
use crate::risk::summary::RiskSummary;
use crate::simulator::gbm::PriceMatrix;
use crate::simulator::params::SimulationParams;

pub const DEFAULT_OUTPUT: &str = "monte_carlo_results.png";
pub const DEFAULT_PATHS_SHOWN: usize = 50;
const SIZE: (u32, u32) = (1200, 600);
const FONT: &str = "sans-serif";
const CORNER_RADIUS: i32 = 8;

/// Draws the first few simulated paths, the start price line and a stats box to a PNG file.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output: PathBuf,
    paths_shown: usize,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT)
    }
}

impl ChartRenderer {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            paths_shown: DEFAULT_PATHS_SHOWN,
        }
    }

    pub fn with_paths_shown(mut self, paths_shown: usize) -> Self {
        self.paths_shown = paths_shown;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    fn draw(
        &self,
        prices: &PriceMatrix,
        summary: &RiskSummary,
        params: &SimulationParams,
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(&self.output, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let last_step = (prices.rows() - 1) as f64;
        let (y_lo, y_hi) = axis_bounds(prices, params.initial_price, self.paths_shown);
        let mut chart = ChartBuilder::on(&root)
            .caption(chart_title(params), (FONT, 24).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..last_step, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Trading Days")
            .y_desc("Price")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .light_line_style(&BLACK.mix(0.05))
            .bold_line_style(&BLACK.mix(0.3))
            .draw()?;

        for p in 0..self.paths_shown.min(prices.paths()) {
            let color = Palette99::pick(p).mix(0.4);
            chart.draw_series(LineSeries::new(
                prices.path(p).enumerate().map(|(t, price)| (t as f64, price)),
                &color,
            ))?;
        }

        let start = params.initial_price;
        chart
            .draw_series(
                dashes(last_step)
                    .map(|(a, b)| PathElement::new(vec![(a, start), (b, start)], BLACK.stroke_width(2))),
            )?
            .label("Start Price")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, 14).into_font())
            .draw()?;

        // stats box anchored near the top-left corner of the plotting area
        let area = chart.plotting_area().strip_coord_spec();
        let (width, height) = area.dim_in_pixel();
        let left = (width as f64 * 0.02) as i32;
        let top = (height as f64 * 0.15) as i32;
        let lines = annotation_lines(summary, params);
        let (pad, line_height, box_width) = (10, 22, 200);
        let bottom = top + 2 * pad + line_height * lines.len() as i32;
        let mut outline = rounded_outline(left, top, left + box_width, bottom, CORNER_RADIUS);
        area.draw(&Polygon::new(outline.clone(), WHITE.mix(0.8).filled()))?;
        outline.push(outline[0]);
        area.draw(&PathElement::new(outline, &BLACK.mix(0.5)))?;
        for (i, line) in lines.iter().enumerate() {
            area.draw(&Text::new(
                line.as_str(),
                (left + pad, top + pad + line_height * i as i32),
                (FONT, 18).into_font(),
            ))?;
        }

        root.present()?;
        Ok(())
    }
}

impl Renderer for ChartRenderer {
    fn render(
        &self,
        prices: &PriceMatrix,
        summary: &RiskSummary,
        params: &SimulationParams,
    ) -> Result<PathBuf, SimulationError> {
        self.draw(prices, summary, params)
            .map_err(|err| SimulationError::Render(err.to_string()))?;
        info!("Saved chart to {}", self.output.display());
        Ok(self.output.clone())
    }
}

pub fn chart_title(params: &SimulationParams) -> String {
    format!("Monte Carlo Simulation: GBM ({} Scenarios)", params.path_count)
}

/// Text of the stats box, one entry per line
pub fn annotation_lines(summary: &RiskSummary, params: &SimulationParams) -> [String; 3] {
    [
        format!("Initial Price: {}", params.initial_price),
        format!("Exp. Mean: {:.2}", summary.expected_mean),
        format!("VaR (95%): {:.2}", summary.value_at_risk_95),
    ]
}

/// y-axis range covering the drawn paths and the start price, padded by 5%.
pub fn axis_bounds(prices: &PriceMatrix, start: f64, paths_shown: usize) -> (f64, f64) {
    let (lo, hi) = prices.bounds(paths_shown.max(1));
    let (lo, hi) = (lo.min(start), hi.max(start));
    let pad = ((hi - lo) * 0.05).max(start.abs() * 0.01).max(f64::EPSILON);
    (lo - pad, hi + pad)
}

/// Outline of a box with quarter-circle corners, clockwise from the top edge
fn rounded_outline(left: i32, top: i32, right: i32, bottom: i32, radius: i32) -> Vec<(i32, i32)> {
    const ARC_STEPS: usize = 6;
    let r = radius.min((right - left) / 2).min((bottom - top) / 2).max(0);
    // corner centres with the angle each quarter arc starts at
    let corners = [
        (right - r, top + r, -90.0_f64),
        (right - r, bottom - r, 0.0),
        (left + r, bottom - r, 90.0),
        (left + r, top + r, 180.0),
    ];
    corners
        .iter()
        .flat_map(|&(cx, cy, start)| {
            (0..=ARC_STEPS).map(move |i| {
                let angle = (start + 90.0 * i as f64 / ARC_STEPS as f64).to_radians();
                (
                    cx + (r as f64 * angle.cos()).round() as i32,
                    cy + (r as f64 * angle.sin()).round() as i32,
                )
            })
        })
        .collect()
}

/// Segments of a dashed line spanning `0..=end` on the x axis
fn dashes(end: f64) -> impl Iterator<Item = (f64, f64)> {
    let dash = (end / 80.0).max(0.05);
    let count = (end / (2.0 * dash)).ceil() as usize;
    (0..count).map(move |i| {
        let a = i as f64 * 2.0 * dash;
        (a, (a + dash).min(end))
    })
}
