use calamine::Data;
use polars::prelude::{DataType, Series};

use crate::models::{ColumnKind, FieldType};

/// Resolves a source field type to the summarization path.
///
/// Null columns are numeric: a column with no present values is reported as a
/// numeric column without data.
pub fn classify(field_type: FieldType) -> ColumnKind {
    match field_type {
        FieldType::Integer | FieldType::Float | FieldType::Null => ColumnKind::Numeric,
        FieldType::Boolean | FieldType::Text | FieldType::Other => ColumnKind::Categorical,
    }
}

pub fn field_type_of_dtype(dtype: &DataType) -> FieldType {
    match dtype {
        DataType::Null => FieldType::Null,
        DataType::Boolean => FieldType::Boolean,
        DataType::String => FieldType::Text,
        dt if dt.is_float() => FieldType::Float,
        dt if dt.is_numeric() => FieldType::Integer,
        _ => FieldType::Other,
    }
}

/// Field type of a parsed CSV series. An inferred string column whose every
/// cell is null carries no text evidence and is treated as Null.
pub fn field_type_of_series(series: &Series) -> FieldType {
    if !series.is_empty() && series.null_count() == series.len() {
        return FieldType::Null;
    }
    field_type_of_dtype(series.dtype())
}

/// Field type of a worksheet column from its cells.
pub fn field_type_of_cells(cells: &[Data]) -> FieldType {
    let (mut ints, mut floats, mut bools, mut others, mut present) = (0, 0, 0, 0, 0);

    for cell in cells.iter().filter(|c| !matches!(c, Data::Empty)) {
        present += 1;
        match cell {
            Data::Int(_) => ints += 1,
            Data::Float(_) => floats += 1,
            Data::Bool(_) => bools += 1,
            _ => others += 1,
        }
    }

    match () {
        _ if present == 0 && !cells.is_empty() => FieldType::Null,
        _ if present == 0 => FieldType::Text,
        _ if others > 0 => FieldType::Text,
        _ if bools == present => FieldType::Boolean,
        _ if bools > 0 => FieldType::Text,
        _ if ints == present => FieldType::Integer,
        _ if ints + floats == present => FieldType::Float,
        _ => FieldType::Other,
    }
}
