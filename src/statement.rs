//! DDL/DML text generation.
//!
//! The builders are pure: the same [`TableSpec`] always yields the same text, and nothing is
//! validated against a catalog. Format-specific fragments come from [`FormatPolicy::for_format`],
//! an exhaustive match over [`FileFormat`], so a new format cannot be added without deciding its
//! delimiter, storage clause and table properties.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{FileFormat, GeneratedStatement, QualifiedTableName, StatementKind, TableSpec};

/// Column type used for every declared column.
pub const COLUMN_TYPE: &str = "STRING";

/// Fixed per-format fragments of the CREATE TABLE statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatPolicy {
    /// Field delimiter for `FIELDS TERMINATED BY`.
    pub delimiter: char,
    /// Argument of `STORED AS`.
    pub storage: &'static str,
    /// `'key'='value'` pairs for `TBLPROPERTIES`, in emission order.
    pub properties: &'static [(&'static str, &'static str)],
}

impl FormatPolicy {
    pub fn for_format(format: FileFormat) -> Self {
        match format {
            FileFormat::Delimited => Self {
                delimiter: ',',
                storage: "TEXTFILE",
                properties: &[("skip.header.line.count", "1")],
            },
            FileFormat::Columnar => Self {
                delimiter: '|',
                storage: "PARQUET",
                properties: &[
                    ("serialization.null.format", "\\N"),
                    ("parquet.compression", "SNAPPY"),
                ],
            },
        }
    }

    fn row_format_clause(&self) -> String {
        format!("ROW FORMAT DELIMITED FIELDS TERMINATED BY '{}'", self.delimiter)
    }

    fn storage_clause(&self) -> String {
        let props = self
            .properties
            .iter()
            .map(|(k, v)| format!("'{k}'='{v}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("STORED AS {} TBLPROPERTIES ({props})", self.storage)
    }
}

/// Build the `CREATE TABLE IF NOT EXISTS` statement for `spec`.
///
/// Columns are emitted one per line in input order, each typed [`COLUMN_TYPE`].
///
/// # Errors
///
/// Returns [`IngestionError::SchemaMismatch`] if `spec.columns` is empty.
///
/// ```rust
/// use warehouse_ingest::statement::build_create_table;
/// use warehouse_ingest::types::{FileFormat, QualifiedTableName, TableSpec};
///
/// let spec = TableSpec::new(
///     QualifiedTableName::new("sales_db_object", "orders"),
///     vec!["order_id".to_string(), "region".to_string()],
///     FileFormat::Delimited,
/// );
/// let ddl = build_create_table(&spec).unwrap();
/// assert!(ddl.as_str().starts_with("CREATE TABLE IF NOT EXISTS sales_db_object.orders ("));
/// assert!(ddl.as_str().contains("    order_id STRING,\n    region STRING\n)"));
/// ```
pub fn build_create_table(spec: &TableSpec) -> IngestionResult<GeneratedStatement> {
    if spec.columns.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: format!("table {} has no columns", spec.name),
        });
    }

    let policy = FormatPolicy::for_format(spec.format);
    let columns = spec
        .columns
        .iter()
        .map(|c| format!("    {c} {COLUMN_TYPE}"))
        .collect::<Vec<_>>()
        .join(",\n");

    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {name} (\n{columns}\n)\n{row_format}\n{storage};",
        name = spec.name,
        row_format = policy.row_format_clause(),
        storage = policy.storage_clause(),
    );
    Ok(GeneratedStatement::new(StatementKind::CreateTable, sql))
}

/// Build the `LOAD DATA ... OVERWRITE` statement for `table`.
///
/// Only the base name of `input_file` is used; it is appended to `staging_prefix`, which is
/// where the file is expected to have been staged already. Prior table contents are replaced.
pub fn build_load_data(
    table: &QualifiedTableName,
    input_file: impl AsRef<Path>,
    staging_prefix: &str,
) -> GeneratedStatement {
    let input_file = input_file.as_ref();
    let base = input_file
        .file_name()
        .unwrap_or(input_file.as_os_str())
        .to_string_lossy();
    let prefix = staging_prefix.trim_end_matches('/');

    let sql = format!("LOAD DATA INPATH '{prefix}/{base}' OVERWRITE INTO TABLE {table};");
    GeneratedStatement::new(StatementKind::LoadData, sql)
}
