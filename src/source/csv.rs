//! CSV header reader.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};

/// Read the header record of a CSV file.
///
/// Labels are returned verbatim (no trimming); normalization happens later.
pub fn read_csv_columns_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::None)
        .from_path(path)?;
    read_csv_columns_from_reader(&mut rdr)
}

/// Read the header record from an existing CSV reader.
///
/// # Errors
///
/// Returns [`IngestionError::SchemaMismatch`] when the input has no header line.
pub fn read_csv_columns_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<Vec<String>> {
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "csv input has no header line".to_string(),
        });
    }
    Ok(headers.iter().map(str::to_owned).collect())
}
