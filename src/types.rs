//! Core data model for statement generation.
//!
//! Every value here is built fresh for one ingestion call and dropped afterwards; nothing is
//! cached between calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};

/// Storage format of the staged input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-delimited text with a header line.
    Delimited,
    /// Apache Parquet.
    Columnar,
}

impl FileFormat {
    /// Parse a file format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Delimited),
            "parquet" | "pq" => Some(Self::Columnar),
            _ => None,
        }
    }

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Delimited => "csv",
            Self::Columnar => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileFormat {
    type Err = IngestionError;

    /// Accepts `csv`/`delimited` and `parquet`/`columnar`; anything else is rejected.
    fn from_str(s: &str) -> IngestionResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "delimited" => Ok(Self::Delimited),
            "parquet" | "columnar" => Ok(Self::Columnar),
            _ => Err(IngestionError::unsupported(s)),
        }
    }
}

/// A `schema.table` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTableName {
    pub schema: String,
    pub table: String,
}

impl QualifiedTableName {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for QualifiedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Everything needed to emit a CREATE TABLE statement.
///
/// `columns` must already be normalized (see [`crate::normalize::normalize_columns`]); every
/// column is declared as `STRING`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: QualifiedTableName,
    pub columns: Vec<String>,
    pub format: FileFormat,
}

impl TableSpec {
    pub fn new(name: QualifiedTableName, columns: Vec<String>, format: FileFormat) -> Self {
        Self {
            name,
            columns,
            format,
        }
    }
}

/// Which of the two statements of an ingestion run a [`GeneratedStatement`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `CREATE TABLE IF NOT EXISTS ...`
    CreateTable,
    /// `LOAD DATA INPATH ... OVERWRITE INTO TABLE ...`
    LoadData,
}

/// One immutable DDL or DML statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStatement {
    kind: StatementKind,
    sql: String,
}

impl GeneratedStatement {
    pub(crate) fn new(kind: StatementKind, sql: String) -> Self {
        Self { kind, sql }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for GeneratedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Opaque connection string handed to the query engine (e.g. `DSN=hive`).
///
/// `Debug` is redacted since DSN-style strings frequently carry credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionDescriptor(String);

impl ConnectionDescriptor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConnectionDescriptor")
            .field(&format_args!("<{} bytes>", self.0.len()))
            .finish()
    }
}

impl From<&str> for ConnectionDescriptor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Whether statements are run against the engine or only shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Surface the statement text; never connect.
    DryRun,
    /// Connect and execute.
    #[default]
    Live,
}

impl ExecutionMode {
    /// Maps the `verbose` toggle: `true` prints instead of executing.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose { Self::DryRun } else { Self::Live }
    }
}
