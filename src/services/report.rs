//! Console text for column summaries.
//!
//! Every function here is pure: the same summary always renders to the same
//! bytes, which keeps repeated runs over the same input comparable.

use std::fmt::Write;

use crate::models::{CategoricalSummary, FieldType, HistogramBin, NumericSummary};

const MIN_EDGE_DECIMALS: usize = 3;
const MAX_EDGE_DECIMALS: usize = 15;

pub fn numeric_header(name: &str) -> String {
    format!("\n--- {} (Numeric) ---\n", name)
}

pub fn render_numeric_empty(name: &str) -> String {
    format!("{}[No valid data to summarize]\n", numeric_header(name))
}

pub fn render_numeric(name: &str, field_type: FieldType, summary: &NumericSummary) -> String {
    let mut out = numeric_header(name);

    let _ = writeln!(
        out,
        "Stats: Obs={}, Missing={}, Zeros={}, Mean={:.2}, Median={:.2}, Mode={}",
        summary.count,
        summary.missing,
        summary.zeros,
        summary.mean,
        summary.median,
        display_value(summary.mode, field_type)
    );
    let _ = writeln!(
        out,
        "Range: {} – {}",
        display_value(summary.min, field_type),
        display_value(summary.max, field_type)
    );

    out.push_str("\nPercentiles:\n");
    for p in &summary.percentiles {
        let label = percentile_label(p.p);
        let _ = writeln!(out, "  {:<7} {}", label, with_thousands(p.value, 2));
    }

    out.push_str("\nFrequency Bins:\n");
    let rows: Vec<(String, usize)> = bin_labels(&summary.histogram)
        .into_iter()
        .zip(summary.histogram.iter().map(|bin| bin.count))
        .collect();
    out.push_str(&frequency_table("Bin", &rows));

    out
}

pub fn render_categorical(
    name: &str,
    summary: &CategoricalSummary,
    preview: usize,
) -> String {
    let mut out = format!("\n--- {} (Categorical) ---\n", name);
    let _ = writeln!(out, "Unique Categories: {}", summary.distinct);
    out.push_str("\nFrequency:\n");

    let shown = if summary.truncated {
        preview.min(summary.frequencies.len())
    } else {
        summary.frequencies.len()
    };
    let rows: Vec<(String, usize)> = summary.frequencies[..shown]
        .iter()
        .map(|c| (c.category.clone(), c.count))
        .collect();
    out.push_str(&frequency_table("Category", &rows));
    if summary.truncated {
        let _ = writeln!(out, "... and {} more categories.", summary.distinct - shown);
    }

    if let (Some(most), Some(least)) = (&summary.most_frequent, &summary.least_frequent) {
        let _ = writeln!(out, "\nMost Frequent: {} ({})", most.category, most.count);
        let _ = writeln!(out, "Least Frequent: {} ({})", least.category, least.count);
    }

    out
}

pub fn truncation_note(max_categories: usize) -> String {
    format!(
        "\nNote: Plot not generated (more than {} unique categories).\n",
        max_categories
    )
}

pub fn percentile_label(p: u8) -> String {
    match p {
        0 => "Min".to_string(),
        25 => "Q1".to_string(),
        50 => "Median".to_string(),
        75 => "Q3".to_string(),
        100 => "Max".to_string(),
        other => format!("{}%", other),
    }
}

/// Labels for a whole histogram. Edge precision starts at three decimals and
/// grows until every pair of distinct edges prints differently.
pub fn bin_labels(bins: &[HistogramBin]) -> Vec<String> {
    let decimals = edge_decimals(bins);
    bins.iter().map(|bin| bin_label(bin, decimals)).collect()
}

pub fn bin_label(bin: &HistogramBin, decimals: usize) -> String {
    let open = if bin.includes_lower { '[' } else { '(' };
    format!("{}{}, {}]", open, edge(bin.lower, decimals), edge(bin.upper, decimals))
}

fn edge_decimals(bins: &[HistogramBin]) -> usize {
    let edges: Vec<f64> = bins
        .first()
        .map(|b| b.lower)
        .into_iter()
        .chain(bins.iter().map(|b| b.upper))
        .collect();

    (MIN_EDGE_DECIMALS..MAX_EDGE_DECIMALS)
        .find(|&decimals| {
            edges
                .windows(2)
                .filter(|w| w[0] != w[1])
                .all(|w| edge(w[0], decimals) != edge(w[1], decimals))
        })
        .unwrap_or(MAX_EDGE_DECIMALS)
}

fn edge(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Integer columns print whole values bare; float columns always keep a
/// fractional digit (`3.0`).
pub fn display_value(value: f64, field_type: FieldType) -> String {
    let whole = value.fract() == 0.0 && value.abs() < 1e15;
    match field_type {
        FieldType::Integer if whole => format!("{}", value as i64),
        _ if whole => format!("{:.1}", value),
        _ => format!("{}", value),
    }
}

/// Fixed-point formatting with comma-grouped thousands, e.g. `12,345.60`.
pub fn with_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn frequency_table(header: &str, rows: &[(String, usize)]) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0);
    let count_width = rows
        .iter()
        .map(|(_, count)| count.to_string().len())
        .chain(std::iter::once("Count".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "  {:<lw$}  {:>cw$}", header, "Count", lw = label_width, cw = count_width);
    for (label, count) in rows {
        let _ = writeln!(out, "  {:<lw$}  {:>cw$}", label, count, lw = label_width, cw = count_width);
    }
    out
}
