//! Frequency tables for categorical columns.

use std::collections::HashMap;

use crate::models::{CategoricalSummary, CategoryCount};

pub struct CategoricalSummarizer {
    max_categories: usize,
}

impl CategoricalSummarizer {
    pub fn new(max_categories: usize) -> Self {
        Self { max_categories }
    }

    pub fn summarize(&self, values: &[String]) -> CategoricalSummary {
        let frequencies = frequency_table(values);
        let distinct = frequencies.len();

        let most_frequent = frequencies.first().cloned();
        let least_frequent = frequencies
            .iter()
            .map(|c| c.count)
            .min()
            .and_then(|min| frequencies.iter().find(|c| c.count == min))
            .cloned();

        CategoricalSummary {
            total: values.len(),
            distinct,
            frequencies,
            most_frequent,
            least_frequent,
            truncated: distinct > self.max_categories,
        }
    }
}

/// Counts per exact text value, ordered by count descending and then by the
/// row where the value first appears.
pub fn frequency_table(values: &[String]) -> Vec<CategoryCount> {
    let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
    for (row, value) in values.iter().enumerate() {
        seen.entry(value.as_str()).or_insert((0, row)).0 += 1;
    }

    let mut ordered: Vec<(&str, usize, usize)> = seen
        .into_iter()
        .map(|(category, (count, first_row))| (category, count, first_row))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ordered
        .into_iter()
        .map(|(category, count, _)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}
