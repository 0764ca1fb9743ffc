use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;

use crate::error::AppError;
use crate::models::{Column, ColumnKind, Dataset, FieldType, MISSING_LABEL};
use crate::services::classifier::{classify, field_type_of_cells, field_type_of_series};

/// Cell texts read as missing in delimited files, besides empty fields.
const NULL_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads a delimited text file or the first sheet of a workbook. The first row
/// holds the column headers.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    if !path.is_file() {
        return Err(AppError::InputNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let start = std::time::Instant::now();
    let dataset = match ext.as_str() {
        "" | "csv" | "txt" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path)?,
        _ => return Err(AppError::UnsupportedFormat(ext)),
    };

    tracing::info!(
        "Loaded {} columns x {} rows from {} in {:?}",
        dataset.column_count(),
        dataset.row_count(),
        path.display(),
        start.elapsed()
    );
    Ok(dataset)
}

fn load_delimited(path: &Path, separator: u8) -> Result<Dataset, AppError> {
    let unparseable = |e: PolarsError| AppError::Unparseable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let df = CsvReader::from_path(path)
        .map_err(unparseable)?
        .has_header(true)
        .with_separator(separator)
        .with_null_values(Some(NullValues::AllColumns(
            NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        )))
        .infer_schema(None)
        .finish()
        .map_err(unparseable)?;

    let columns = df
        .get_columns()
        .iter()
        .map(column_from_series)
        .collect::<Result<Vec<_>, _>>()?;

    Dataset::new(columns)
}

fn column_from_series(series: &Series) -> Result<Column, AppError> {
    let field_type = field_type_of_series(series);
    let kind = classify(field_type);
    tracing::debug!("column '{}' ({}) -> {:?} / {:?}", series.name(), series.dtype(), field_type, kind);

    let column = match kind {
        ColumnKind::Numeric if field_type == FieldType::Null => {
            Column::numeric(series.name(), field_type, vec![None; series.len()])
        }
        ColumnKind::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = floats.f64()?.into_iter().collect();
            Column::numeric(series.name(), field_type, values)
        }
        ColumnKind::Categorical => {
            let text = series.cast(&DataType::String)?;
            let values: Vec<String> = text
                .str()?
                .into_iter()
                .map(|v| v.map_or_else(|| MISSING_LABEL.to_string(), str::to_string))
                .collect();
            Column::categorical(series.name(), field_type, values)
        }
    };
    Ok(column)
}

fn load_workbook(path: &Path) -> Result<Dataset, AppError> {
    let unparseable = |reason: String| AppError::Unparseable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| unparseable(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| unparseable("No sheets found in workbook".to_string()))?;
    tracing::info!("Reading worksheet '{}'", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unparseable(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => {
            let mut existing = HashSet::new();
            header_row
                .iter()
                .enumerate()
                .map(|(idx, cell)| unique_header(&cell.to_string(), idx, &mut existing))
                .collect()
        }
        None => return Dataset::new(Vec::new()),
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Data> = body
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or(Data::Empty))
                .collect();
            column_from_cells(name, &cells)
        })
        .collect();

    Dataset::new(columns)
}

fn column_from_cells(name: &str, cells: &[Data]) -> Column {
    let field_type = field_type_of_cells(cells);
    let kind = classify(field_type);
    tracing::debug!("column '{}' -> {:?} / {:?}", name, field_type, kind);

    match kind {
        ColumnKind::Numeric => {
            let values = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i as f64),
                    Data::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            Column::numeric(name, field_type, values)
        }
        ColumnKind::Categorical => {
            let values = cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty => MISSING_LABEL.to_string(),
                    other => other.to_string(),
                })
                .collect();
            Column::categorical(name, field_type, values)
        }
    }
}

/// Blank headers become `Unnamed: <idx>`; repeats get a `.1`, `.2`, ... suffix.
fn unique_header(raw: &str, idx: usize, existing: &mut HashSet<String>) -> String {
    let base = match raw.trim() {
        "" => format!("Unnamed: {}", idx),
        name => name.to_string(),
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    while !existing.insert(candidate.clone()) {
        candidate = format!("{}.{}", base, counter);
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnValues;
    use std::fs;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn missing_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nope.csv");
        assert!(matches!(load_dataset(&path), Err(AppError::InputNotFound(p)) if p == path));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(&tmp, "data.parquet", "a\n1\n");
        assert!(matches!(load_dataset(&path), Err(AppError::UnsupportedFormat(ext)) if ext == "parquet"));
    }

    #[test]
    fn csv_columns_are_classified_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            &tmp,
            "people.csv",
            "age,height,city,empty\n31,1.80,Lisbon,\n,1.65,Porto,\n45,1.72,Lisbon,\n",
        );

        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_count(), 4);

        let cols = dataset.columns();
        assert_eq!(cols[0].name(), "age");
        assert_eq!(cols[0].field_type(), FieldType::Integer);
        assert_eq!(cols[0].values(), &ColumnValues::Numeric(vec![Some(31.0), None, Some(45.0)]));

        assert_eq!(cols[1].field_type(), FieldType::Float);
        assert_eq!(cols[1].kind(), ColumnKind::Numeric);

        assert_eq!(cols[2].kind(), ColumnKind::Categorical);
        assert_eq!(
            cols[2].values(),
            &ColumnValues::Categorical(vec!["Lisbon".into(), "Porto".into(), "Lisbon".into()])
        );

        assert_eq!(cols[3].field_type(), FieldType::Null);
        assert_eq!(cols[3].kind(), ColumnKind::Numeric);
        assert_eq!(cols[3].values(), &ColumnValues::Numeric(vec![None, None, None]));
    }

    #[test]
    fn null_tokens_read_as_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(&tmp, "x.csv", "x\n1\nNA\n3\n");
        let dataset = load_dataset(&path).unwrap();

        let column = &dataset.columns()[0];
        assert_eq!(column.field_type(), FieldType::Integer);
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.values(), &ColumnValues::Numeric(vec![Some(1.0), None, Some(3.0)]));
    }

    #[test]
    fn null_tokens_in_text_columns_become_the_missing_label() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(&tmp, "pets.csv", "pet,weight\ncat,4.5\nNULL,N/A\ndog,n/a\n");
        let dataset = load_dataset(&path).unwrap();

        let cols = dataset.columns();
        assert_eq!(
            cols[0].values(),
            &ColumnValues::Categorical(vec!["cat".into(), MISSING_LABEL.into(), "dog".into()])
        );
        assert_eq!(cols[1].field_type(), FieldType::Float);
        assert_eq!(cols[1].values(), &ColumnValues::Numeric(vec![Some(4.5), None, None]));
    }

    #[test]
    fn tsv_uses_tabs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(&tmp, "scores.tsv", "name\tscore\nann\t3\nbob\t4\n");
        let dataset = load_dataset(&path).unwrap();
        assert_eq!(dataset.column_count(), 2);
        assert_eq!(dataset.columns()[1].kind(), ColumnKind::Numeric);
    }

    #[test]
    fn workbook_cells_become_columns() {
        let cells = vec![Data::String("a".into()), Data::Empty, Data::Int(3)];
        let column = column_from_cells("mixed", &cells);
        assert_eq!(column.field_type(), FieldType::Text);
        assert_eq!(
            column.values(),
            &ColumnValues::Categorical(vec!["a".into(), MISSING_LABEL.into(), "3".into()])
        );

        let numbers = column_from_cells("n", &[Data::Int(2), Data::Empty, Data::Float(0.5)]);
        assert_eq!(numbers.values(), &ColumnValues::Numeric(vec![Some(2.0), None, Some(0.5)]));
    }

    #[test]
    fn headers_are_made_unique() {
        let mut existing = HashSet::new();
        assert_eq!(unique_header("price", 0, &mut existing), "price");
        assert_eq!(unique_header(" price ", 1, &mut existing), "price.1");
        assert_eq!(unique_header("", 2, &mut existing), "Unnamed: 2");
        assert_eq!(unique_header("price", 3, &mut existing), "price.2");
    }
}
