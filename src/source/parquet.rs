//! Parquet header reader.

use std::fs::File;
use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;

use crate::error::{IngestionError, IngestionResult};

/// Read the top-level column names of a Parquet file from its footer.
///
/// Nested groups are reported by their top-level name only, which is what a table loaded from
/// the file would expose.
pub fn read_parquet_columns_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<String>> {
    let file = File::open(path.as_ref())?;
    let reader = SerializedFileReader::new(file)?;
    read_parquet_columns(&reader)
}

/// Read top-level column names from an open Parquet reader.
pub fn read_parquet_columns<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> IngestionResult<Vec<String>> {
    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    if columns.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "parquet schema has no columns".to_string(),
        });
    }
    Ok(columns)
}
