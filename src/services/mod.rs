pub mod analyzer;
pub mod categorical;
pub mod chart;
pub mod classifier;
pub mod export;
pub mod loader;
pub mod numeric;
pub mod report;

pub use analyzer::UnivariateAnalyzer;
pub use chart::{PlotSink, SvgBarChartRenderer};
pub use loader::load_dataset;
