use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod error;
mod logging;
mod models;
mod services;

use services::{load_dataset, PlotSink, SvgBarChartRenderer, UnivariateAnalyzer};

/// Perform univariate analysis on every column of a CSV or Excel file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input file (.csv, .tsv, .xlsx, ...)
    filepath: PathBuf,

    /// Directory the distribution charts are written to
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Also write every column summary as JSON to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = report_failure(&e, &mut io::stderr());
            ExitCode::FAILURE
        }
    }
}

/// Failures are printed once, on stderr, with their context chain.
fn report_failure<W: Write>(err: &anyhow::Error, out: &mut W) -> io::Result<()> {
    writeln!(out, "Error: {:#}", err)
}

fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = config::load_config()?;
    if let Some(dir) = args.plot_dir {
        config.plot_dir = dir;
    }

    // Nothing is written until the whole input has been read
    let dataset = load_dataset(&args.filepath)?;

    let sink = PlotSink::create(&config.plot_dir)
        .with_context(|| format!("Failed to create plot directory '{}'", config.plot_dir.display()))?;

    let analyzer = UnivariateAnalyzer::new(&config, SvgBarChartRenderer::default(), &sink);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let reports = analyzer.analyze(&dataset, &mut out)?;
    out.flush()?;

    if let Some(path) = args.summary_json {
        services::export::write_summary_json(&path, &reports)
            .with_context(|| format!("Failed to write summary to '{}'", path.display()))?;
    }

    Ok(())
}
