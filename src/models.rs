use serde::Serialize;
use std::path::PathBuf;

use crate::error::AppError;

/// Text used for a missing cell once a column is coerced to categories.
pub const MISSING_LABEL: &str = "nan";

/// Source field type of a column, as resolved by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every cell is missing.
    Null,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(values) => values.len(),
            ColumnValues::Categorical(values) => values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    field_type: FieldType,
    kind: ColumnKind,
    values: ColumnValues,
}

impl Column {
    pub fn numeric(name: impl Into<String>, field_type: FieldType, values: Vec<Option<f64>>) -> Self {
        // NaN and infinities carry no position on the number line.
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Self {
            name: name.into(),
            field_type,
            kind: ColumnKind::Numeric,
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, field_type: FieldType, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            kind: ColumnKind::Categorical,
            values: ColumnValues::Categorical(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, AppError> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(AppError::RaggedColumns {
                column: bad.name().to_string(),
                expected: row_count,
                found: bad.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    pub p: u8,
    pub value: f64,
}

/// One equal-width histogram bin. Bins are right-closed; the first bin
/// also includes its lower edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub includes_lower: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub missing: usize,
    pub zeros: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub percentiles: Vec<Percentile>,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub total: usize,
    pub distinct: usize,
    /// Descending by count, ties in first-seen order.
    pub frequencies: Vec<CategoryCount>,
    pub most_frequent: Option<CategoryCount>,
    pub least_frequent: Option<CategoryCount>,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "summary", rename_all = "lowercase")]
pub enum ColumnSummary {
    /// `None` when the column has no present values.
    Numeric(Option<NumericSummary>),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartStatus {
    Saved { path: PathBuf },
    Skipped,
    NotRequested,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub field_type: FieldType,
    #[serde(flatten)]
    pub summary: ColumnSummary,
    pub chart: ChartStatus,
}
