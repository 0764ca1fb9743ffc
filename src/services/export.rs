use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AppError;
use crate::models::ColumnReport;

/// Writes all column reports as a pretty-printed JSON array.
pub fn write_summary_json(path: &Path, reports: &[ColumnReport]) -> Result<(), AppError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    tracing::info!("Wrote {} column summaries to {}", reports.len(), path.display());
    Ok(())
}
