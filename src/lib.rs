//! `warehouse-ingest` loads one CSV or Parquet file into a Hive-style warehouse table by
//! generating and running two statements: a `CREATE TABLE IF NOT EXISTS` whose shape depends on
//! the file format, and a `LOAD DATA INPATH ... OVERWRITE` pointing at the staged file.
//!
//! The primary entrypoint is [`pipeline::Ingestor`]. [`pipeline::Ingestor::ingest_file`] reads
//! the header of the file, normalizes the column labels into warehouse identifiers and executes
//! both statements; [`pipeline::Ingestor::ingest`] does the same for a caller-supplied column list.
//!
//! ## Formats
//!
//! | Format | Extension | Delimiter | Storage | Table properties |
//! |---|---|---|---|---|
//! | [`types::FileFormat::Delimited`] | `.csv` | `,` | `TEXTFILE` | header line skipped |
//! | [`types::FileFormat::Columnar`] | `.parquet`, `.pq` | `\|` | `PARQUET` | `\N` null marker, SNAPPY |
//!
//! Every column is declared `STRING`; no type inference is done.
//!
//! ## Quick example: dry run
//!
//! ```rust
//! use warehouse_ingest::config::WarehouseConfig;
//! use warehouse_ingest::execution::{ExecutionOutcome, OfflineEngine};
//! use warehouse_ingest::pipeline::Ingestor;
//! use warehouse_ingest::types::{ExecutionMode, FileFormat};
//!
//! # fn main() -> Result<(), warehouse_ingest::IngestionError> {
//! let ingestor = Ingestor::new(WarehouseConfig::default(), OfflineEngine);
//! let report = ingestor.ingest(
//!     "orders",
//!     "orders.csv",
//!     FileFormat::Delimited,
//!     &["Order Id", "Sale-Date", " Region "],
//!     ExecutionMode::DryRun,
//! )?;
//! assert!(matches!(report.create, ExecutionOutcome::Printed { .. }));
//! assert!(report.create.printed_sql().unwrap().contains("order_id STRING"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Live execution
//!
//! Live runs go through a [`execution::QueryEngine`]. With the `odbc` cargo feature the crate
//! provides `execution::OdbcEngine`; without it, [`execution::OfflineEngine`] reports every
//! live statement as failed. Failures while connecting or executing are reported, never
//! propagated, and the LOAD statement is attempted even if CREATE failed.
//!
//! ## Modules
//!
//! - [`normalize`]: column label → identifier
//! - [`statement`]: CREATE TABLE / LOAD DATA text
//! - [`execution`]: engine traits and the dry-run aware executor
//! - [`pipeline`]: the one-file orchestrator
//! - [`source`]: CSV/Parquet header readers
//! - [`observability`]: progress/outcome observers
//! - [`config`]: warehouse settings
//! - [`error`]: error type used across the crate

pub mod cli;
pub mod config;
pub mod error;
pub mod execution;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod source;
pub mod statement;
pub mod types;

pub use error::{IngestionError, IngestionResult};
