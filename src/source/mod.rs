//! Header readers for staged input files.
//!
//! Only the column labels are read; row data is never touched. Callers normally go through
//! [`read_columns_from_path`], which infers the [`FileFormat`] from the extension and fails
//! fast with [`IngestionError::UnsupportedFormat`] for anything else.

pub mod csv;
pub mod parquet;

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::FileFormat;

/// Infer the file format from the path's extension.
pub fn infer_format_from_path(path: &Path) -> IngestionResult<FileFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::unsupported(format!("<no extension> ({})", path.display())))?;

    FileFormat::from_extension(ext).ok_or_else(|| IngestionError::unsupported(format!(".{ext}")))
}

/// Read raw column labels from `path` using the reader for `format`.
pub fn read_columns(path: impl AsRef<Path>, format: FileFormat) -> IngestionResult<Vec<String>> {
    let path = path.as_ref();
    let columns = match format {
        FileFormat::Delimited => csv::read_csv_columns_from_path(path)?,
        FileFormat::Columnar => parquet::read_parquet_columns_from_path(path)?,
    };
    log::debug!(
        "read {} column(s) from {} ({format})",
        columns.len(),
        path.display()
    );
    Ok(columns)
}

/// Infer the format of `path`, then read its column labels.
pub fn read_columns_from_path(path: impl AsRef<Path>) -> IngestionResult<(FileFormat, Vec<String>)> {
    let path = path.as_ref();
    let format = infer_format_from_path(path)?;
    let columns = read_columns(path, format)?;
    Ok((format, columns))
}
