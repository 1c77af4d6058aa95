use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Only [`IngestionError::UnsupportedFormat`], [`IngestionError::SchemaMismatch`] and the
/// reader/config variants ever reach the caller of [`crate::pipeline::Ingestor`].
/// [`IngestionError::Execution`] is converted into a reported outcome by the executor, and
/// [`IngestionError::Cleanup`] is only logged.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV header could not be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet footer/schema could not be read.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The declared or inferred file format is not one of the supported variants.
    #[error("unsupported file type: {format}")]
    UnsupportedFormat { format: String },

    /// The input cannot be turned into a table definition (no header, no columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Connecting to the query engine or running a statement failed.
    #[error("execution failed: {message}")]
    Execution { message: String },

    /// Releasing a cursor or connection failed.
    #[error("cleanup failed: {message}")]
    Cleanup { message: String },
}

impl IngestionError {
    pub(crate) fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}
