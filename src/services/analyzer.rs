use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ChartStatus, Column, ColumnReport, ColumnSummary, ColumnValues, Dataset};
use crate::services::categorical::CategoricalSummarizer;
use crate::services::chart::{BarChart, ChartRenderer, PlotSink, RenderOutcome};
use crate::services::numeric::NumericSummarizer;
use crate::services::report;

/// Walks the columns of a dataset in order, writing one report section per
/// column and handing each frequency table to the chart renderer.
pub struct UnivariateAnalyzer<'a, R: ChartRenderer> {
    config: &'a Config,
    renderer: R,
    sink: &'a PlotSink,
    numeric: NumericSummarizer,
    categorical: CategoricalSummarizer,
}

impl<'a, R: ChartRenderer> UnivariateAnalyzer<'a, R> {
    pub fn new(config: &'a Config, renderer: R, sink: &'a PlotSink) -> Self {
        Self {
            config,
            renderer,
            sink,
            numeric: NumericSummarizer::new(config.max_bins),
            categorical: CategoricalSummarizer::new(config.max_categories),
        }
    }

    pub fn analyze<W: Write>(&self, dataset: &Dataset, out: &mut W) -> Result<Vec<ColumnReport>, AppError> {
        let start = std::time::Instant::now();
        tracing::info!("Starting analysis of {} columns", dataset.column_count());

        writeln!(
            out,
            "=== Starting Univariate Analysis: {} columns, {} rows ===",
            dataset.column_count(),
            dataset.row_count()
        )?;

        let mut reports = Vec::with_capacity(dataset.column_count());
        for column in dataset.columns() {
            reports.push(self.analyze_column(column, out)?);
        }

        writeln!(out, "\n=== Analysis Complete ===")?;
        writeln!(
            out,
            "All plots have been saved in the '{}/' directory.",
            self.sink.dir().display()
        )?;

        tracing::info!("Analysis completed in {:?}", start.elapsed());
        Ok(reports)
    }

    fn analyze_column<W: Write>(&self, column: &Column, out: &mut W) -> Result<ColumnReport, AppError> {
        let name = column.name();
        tracing::debug!("Summarizing column '{}' as {:?}", name, column.kind());

        let (summary, chart) = match column.values() {
            ColumnValues::Numeric(values) => match self.numeric.summarize(values) {
                None => {
                    write!(out, "{}", report::render_numeric_empty(name))?;
                    (ColumnSummary::Numeric(None), ChartStatus::NotRequested)
                }
                Some(summary) => {
                    write!(out, "{}", report::render_numeric(name, column.field_type(), &summary))?;
                    let bars = report::bin_labels(&summary.histogram)
                        .into_iter()
                        .zip(summary.histogram.iter().map(|bin| bin.count));
                    let status = self.render_chart(&BarChart::distribution(name, bars), name, out)?;
                    (ColumnSummary::Numeric(Some(summary)), status)
                }
            },
            ColumnValues::Categorical(values) => {
                let summary = self.categorical.summarize(values);
                write!(
                    out,
                    "{}",
                    report::render_categorical(name, &summary, self.config.preview_categories)
                )?;
                let status = if summary.truncated {
                    write!(out, "{}", report::truncation_note(self.config.max_categories))?;
                    ChartStatus::NotRequested
                } else {
                    let bars = summary
                        .frequencies
                        .iter()
                        .map(|c| (c.category.clone(), c.count));
                    self.render_chart(&BarChart::distribution(name, bars), name, out)?
                };
                (ColumnSummary::Categorical(summary), status)
            }
        };

        Ok(ColumnReport {
            name: name.to_string(),
            field_type: column.field_type(),
            summary,
            chart,
        })
    }

    fn render_chart<W: Write>(&self, chart: &BarChart, column: &str, out: &mut W) -> Result<ChartStatus, AppError> {
        let dest = self.sink.chart_path(column, self.renderer.extension());

        let status = match self.renderer.render(chart, &dest) {
            Ok(RenderOutcome::Written(path)) => {
                writeln!(out, "✓ Plot saved: {}", file_name(&path))?;
                ChartStatus::Saved { path }
            }
            Ok(RenderOutcome::Skipped) => {
                writeln!(out, "✗ Plot not generated for '{}': No data.", chart.title)?;
                ChartStatus::Skipped
            }
            Err(e) => {
                tracing::error!("Failed to render chart for column '{}': {}", column, e);
                writeln!(out, "✗ Plot failed for '{}': {}", chart.title, e)?;
                ChartStatus::Failed { reason: e.to_string() }
            }
        };
        Ok(status)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChartError;
    use crate::models::FieldType;
    use crate::services::chart::SvgBarChartRenderer;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records every chart it is asked to draw without touching the disk.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(BarChart, PathBuf)>>,
        fail_for: Option<String>,
    }

    impl ChartRenderer for &RecordingRenderer {
        fn extension(&self) -> &'static str {
            "png"
        }

        fn render(&self, chart: &BarChart, dest: &Path) -> Result<RenderOutcome, ChartError> {
            self.calls.borrow_mut().push((chart.clone(), dest.to_path_buf()));
            if chart.bars.is_empty() {
                return Ok(RenderOutcome::Skipped);
            }
            if self.fail_for.as_deref() == Some(chart.x_label.as_str()) {
                return Err(ChartError::Write {
                    path: dest.to_path_buf(),
                    reason: "disk full".to_string(),
                });
            }
            Ok(RenderOutcome::Written(dest.to_path_buf()))
        }
    }

    fn sample_dataset() -> Dataset {
        let ids: Vec<String> = (0..60).map(|i| format!("row-{}", i)).collect();
        let mut colors: Vec<String> = ["red", "blue", "red", "nan", "green", "red"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        colors.extend(std::iter::repeat("blue".to_string()).take(54));
        let mut score = vec![Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(3.0), Some(3.0), None];
        score.extend(std::iter::repeat(Some(0.0)).take(53));

        Dataset::new(vec![
            Column::numeric("Test Score", FieldType::Integer, score),
            Column::categorical("Color", FieldType::Text, colors),
            Column::categorical("Row Id", FieldType::Text, ids),
            Column::numeric("Income", FieldType::Null, vec![None; 60]),
        ])
        .unwrap()
    }

    fn run(renderer: &RecordingRenderer, sink: &PlotSink) -> (String, Vec<ColumnReport>) {
        let config = Config::default();
        let analyzer = UnivariateAnalyzer::new(&config, renderer, sink);
        let mut out = Vec::new();
        let reports = analyzer.analyze(&sample_dataset(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), reports)
    }

    #[test]
    fn every_column_gets_a_section_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path().join("plots")).unwrap();
        let renderer = RecordingRenderer::default();
        let (text, reports) = run(&renderer, &sink);

        assert!(text.starts_with("=== Starting Univariate Analysis: 4 columns, 60 rows ===\n"));
        let positions: Vec<usize> = [
            "--- Test Score (Numeric) ---",
            "--- Color (Categorical) ---",
            "--- Row Id (Categorical) ---",
            "--- Income (Numeric) ---",
        ]
        .iter()
        .map(|h| text.find(h).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("=== Analysis Complete ==="));
        assert_eq!(reports.len(), 4);
    }

    #[test]
    fn charts_only_for_eligible_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path().join("plots")).unwrap();
        let renderer = RecordingRenderer::default();
        let (text, reports) = run(&renderer, &sink);

        let calls = renderer.calls.borrow();
        let drawn: Vec<&str> = calls.iter().map(|(c, _)| c.x_label.as_str()).collect();
        assert_eq!(drawn, vec!["Test Score", "Color"]);
        assert_eq!(calls[0].1, sink.dir().join("test_score_distribution.png"));

        // numeric histogram bars sum to the present count
        let total: f64 = calls[0].0.bars.iter().map(|b| b.value).sum();
        assert_eq!(total, 59.0);
        // categorical bars sum to the row count, missing included
        let total: f64 = calls[1].0.bars.iter().map(|b| b.value).sum();
        assert_eq!(total, 60.0);
        assert_eq!(calls[1].0.bars[0].label, "blue");

        assert!(text.contains("✓ Plot saved: test_score_distribution.png"));
        assert!(text.contains("Unique Categories: 60\n"));
        assert!(text.contains("... and 50 more categories.\n"));
        assert!(text.contains("Note: Plot not generated (more than 50 unique categories)."));
        assert!(text.contains("--- Income (Numeric) ---\n[No valid data to summarize]\n"));

        assert!(matches!(reports[0].chart, ChartStatus::Saved { .. }));
        assert_eq!(reports[2].chart, ChartStatus::NotRequested);
        assert_eq!(reports[3].summary, ColumnSummary::Numeric(None));
        assert_eq!(reports[3].chart, ChartStatus::NotRequested);
    }

    #[test]
    fn chart_failure_does_not_stop_the_run() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path().join("plots")).unwrap();
        let renderer = RecordingRenderer {
            fail_for: Some("Test Score".to_string()),
            ..Default::default()
        };
        let (text, reports) = run(&renderer, &sink);

        assert!(text.contains("✗ Plot failed for 'Test Score Distribution'"));
        assert!(text.contains("--- Color (Categorical) ---"));
        assert!(matches!(reports[0].chart, ChartStatus::Failed { .. }));
        assert!(matches!(reports[1].chart, ChartStatus::Saved { .. }));
    }

    #[test]
    fn empty_categorical_column_is_skipped_by_the_renderer() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path()).unwrap();
        let renderer = RecordingRenderer::default();
        let config = Config::default();
        let analyzer = UnivariateAnalyzer::new(&config, &renderer, &sink);
        let dataset = Dataset::new(vec![Column::categorical("Notes", FieldType::Text, Vec::new())]).unwrap();

        let mut out = Vec::new();
        let reports = analyzer.analyze(&dataset, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Unique Categories: 0\n"));
        assert!(text.contains("✗ Plot not generated for 'Notes Distribution': No data."));
        assert_eq!(reports[0].chart, ChartStatus::Skipped);
    }

    #[test]
    fn repeated_runs_print_identical_text() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path().join("plots")).unwrap();
        let first = run(&RecordingRenderer::default(), &sink).0;
        let second = run(&RecordingRenderer::default(), &sink).0;
        assert_eq!(first, second);
    }

    #[test]
    fn svg_charts_land_in_the_sink() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = PlotSink::create(tmp.path().join("plots")).unwrap();
        let config = Config::default();
        let analyzer = UnivariateAnalyzer::new(&config, SvgBarChartRenderer::default(), &sink);

        let mut out = Vec::new();
        analyzer.analyze(&sample_dataset(), &mut out).unwrap();

        assert!(sink.dir().join("test_score_distribution.svg").is_file());
        assert!(sink.dir().join("color_distribution.svg").is_file());
        assert!(!sink.dir().join("row_id_distribution.svg").exists());
        assert!(!sink.dir().join("income_distribution.svg").exists());
    }
}
