//! Descriptive statistics and equal-width histograms for numeric columns.

use std::cmp::Ordering;

use crate::models::{HistogramBin, NumericSummary, Percentile};

/// Percentiles reported for every numeric column.
pub const PERCENTILES: [u8; 9] = [0, 1, 5, 25, 50, 75, 95, 99, 100];

pub struct NumericSummarizer {
    max_bins: usize,
}

impl NumericSummarizer {
    pub fn new(max_bins: usize) -> Self {
        Self { max_bins: max_bins.max(1) }
    }

    /// Returns `None` when the column has no present values.
    pub fn summarize(&self, values: &[Option<f64>]) -> Option<NumericSummary> {
        let mut present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }
        present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let count = present.len();
        let missing = values.len() - count;
        let zeros = present.iter().filter(|v| **v == 0.0).count();
        let min = present[0];
        let max = present[count - 1];
        let mean = present.iter().sum::<f64>() / count as f64;

        let percentiles: Vec<Percentile> = PERCENTILES
            .iter()
            .map(|&p| Percentile { p, value: percentile(&present, p as f64) })
            .collect();

        let distinct = count_distinct(&present);
        let histogram = histogram(&present, distinct.min(self.max_bins));

        Some(NumericSummary {
            count,
            missing,
            zeros,
            min,
            max,
            mean,
            median: percentile(&present, 50.0),
            mode: mode(&present),
            percentiles,
            histogram,
        })
    }
}

/// Linear interpolation between the two ranked values bracketing
/// `p / 100 * (n - 1)`. `sorted` must be non-empty and ascending.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Most frequent value; ties go to the smallest. `sorted` must be non-empty and ascending.
pub fn mode(sorted: &[f64]) -> f64 {
    let mut best = sorted[0];
    let mut best_run = 0;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if run > best_run {
            best = value;
            best_run = run;
        }
        i += run;
    }
    best
}

fn count_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Splits `[min, max]` into `bins` equal-width intervals. A value on an interior
/// edge belongs to the lower bin; the minimum belongs to the first bin.
pub fn histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    if sorted.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let width = (max - min) / bins as f64;

    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();

    let mut counts = vec![0usize; bins];
    for &value in sorted {
        let idx = edges[1..].partition_point(|&upper| upper < value);
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: edges[i],
            upper: edges[i + 1],
            includes_lower: i == 0,
            count,
        })
        .collect()
}
