use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{AppError, ChartError};
use crate::services::report::with_thousands;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// A labeled frequency table ready to be drawn, bars in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn distribution<I>(column: &str, bars: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        Self {
            title: format!("{} Distribution", column),
            x_label: column.to_string(),
            y_label: "Count".to_string(),
            bars: bars
                .into_iter()
                .map(|(label, count)| Bar { label, value: count as f64 })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Written(PathBuf),
    /// Nothing to draw; no file was touched.
    Skipped,
}

pub trait ChartRenderer {
    /// File extension of the images this renderer produces.
    fn extension(&self) -> &'static str;

    fn render(&self, chart: &BarChart, dest: &Path) -> Result<RenderOutcome, ChartError>;
}

/// Output directory for chart files, created once before the first column.
#[derive(Debug, Clone)]
pub struct PlotSink {
    dir: PathBuf,
}

impl PlotSink {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!("plot directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn chart_path(&self, column: &str, extension: &str) -> PathBuf {
        self.dir.join(chart_file_name(column, extension))
    }
}

pub fn chart_file_name(column: &str, extension: &str) -> String {
    let stem: String = column
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect::<String>()
        .to_lowercase();
    format!("{}_distribution.{}", stem, extension)
}

pub struct SvgBarChartRenderer {
    width: u32,
    height: u32,
}

impl Default for SvgBarChartRenderer {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

impl SvgBarChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn draw(&self, chart: &BarChart, dest: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let root = SVGBackend::new(dest, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = chart.bars.len();
        let top = chart.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let y_max = if top > 0.0 { top * 1.1 } else { 1.0 };

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(160)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        let formatter = |x: &SegmentValue<usize>| match x {
            SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(n + 1)
            .x_label_formatter(&formatter)
            .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
            .axis_desc_style(("sans-serif", 16))
            .draw()?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
                viridis(i, n).mix(0.9).filled(),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
                BLACK.stroke_width(1),
            );
            rect.set_margin(0, 0, 6, 6);
            rect
        }))?;

        let annotation = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                with_thousands(bar.value, 0),
                (SegmentValue::CenterOf(i), bar.value),
                annotation.clone(),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

impl ChartRenderer for SvgBarChartRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(&self, chart: &BarChart, dest: &Path) -> Result<RenderOutcome, ChartError> {
        if chart.bars.is_empty() {
            return Ok(RenderOutcome::Skipped);
        }

        self.draw(chart, dest).map_err(|e| ChartError::Write {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!("rendered {} bars to {}", chart.bars.len(), dest.display());
        Ok(RenderOutcome::Written(dest.to_path_buf()))
    }
}

// Sampled from matplotlib's viridis map.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

fn viridis(index: usize, len: usize) -> RGBColor {
    let t = if len > 1 { index as f64 / (len - 1) as f64 } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(VIRIDIS.len() - 1);
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    let frac = scaled - lo as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(
        lerp(VIRIDIS[lo].0, VIRIDIS[hi].0),
        lerp(VIRIDIS[lo].1, VIRIDIS[hi].1),
        lerp(VIRIDIS[lo].2, VIRIDIS[hi].2),
    )
}
