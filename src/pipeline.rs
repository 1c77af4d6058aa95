//! One-file ingestion: normalize → build statements → execute CREATE, then LOAD.
//!
//! Both statements are built before anything is executed, so an unsupported format or an empty
//! column list aborts the call without touching the engine. Once execution starts, a failed
//! CREATE does not stop the LOAD from being attempted, and nothing is rolled back.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::WarehouseConfig;
use crate::error::IngestionResult;
use crate::execution::{ExecutionOutcome, Executor, QueryEngine};
use crate::normalize::normalize_columns;
use crate::observability::{IngestionContext, IngestionObserver};
use crate::source::read_columns_from_path;
use crate::statement::{build_create_table, build_load_data};
use crate::types::{ExecutionMode, FileFormat, TableSpec};

/// Outcomes of the two statements of one ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub create: ExecutionOutcome,
    pub load: ExecutionOutcome,
}

impl IngestionReport {
    /// `true` when neither statement failed.
    pub fn is_ok(&self) -> bool {
        self.create.is_ok() && self.load.is_ok()
    }
}

/// Drives ingestion of a single file against a [`QueryEngine`].
pub struct Ingestor<E: QueryEngine> {
    config: WarehouseConfig,
    engine: E,
    observer: Option<Arc<dyn IngestionObserver>>,
}

impl<E: QueryEngine> fmt::Debug for Ingestor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ingestor")
            .field("config", &self.config)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl<E: QueryEngine> Ingestor<E> {
    pub fn new(config: WarehouseConfig, engine: E) -> Self {
        Self {
            config,
            engine,
            observer: None,
        }
    }

    /// Attach an observer for progress and statement outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Ingest `input_file` into `table` using already-known column labels.
    ///
    /// `columns` are normalized here; only the normalized names reach the generated SQL.
    ///
    /// # Errors
    ///
    /// Only statement-building errors are returned. Execution failures are reported through
    /// the returned [`IngestionReport`] and the observer.
    pub fn ingest<S: AsRef<str>>(
        &self,
        table: &str,
        input_file: impl AsRef<Path>,
        format: FileFormat,
        columns: &[S],
        mode: ExecutionMode,
    ) -> IngestionResult<IngestionReport> {
        let input_file = input_file.as_ref();
        let name = self.config.qualify(table);
        let spec = TableSpec::new(name.clone(), normalize_columns(columns), format);

        let create_sql = build_create_table(&spec)?;
        let load_sql = build_load_data(&name, input_file, &self.config.staging_prefix);

        let ctx = IngestionContext {
            table: name,
            input: input_file.to_path_buf(),
            format,
            mode,
        };
        log::info!(
            "ingesting {} into {} ({} column(s), {mode:?})",
            input_file.display(),
            ctx.table,
            spec.columns.len()
        );
        if let Some(obs) = &self.observer {
            obs.on_ingest_started(&ctx);
        }

        let mut executor = Executor::new(&self.engine, self.config.connection.clone());
        if let Some(obs) = &self.observer {
            executor = executor.with_observer(Arc::clone(obs));
        }

        let create = executor.execute(&create_sql, mode);
        if !create.is_ok() {
            log::warn!("CREATE TABLE for {} failed; attempting LOAD DATA anyway", ctx.table);
        }
        let load = executor.execute(&load_sql, mode);

        Ok(IngestionReport { create, load })
    }

    /// Read the header of `path` (format inferred from its extension) and ingest it into `table`.
    pub fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        table: &str,
        mode: ExecutionMode,
    ) -> IngestionResult<IngestionReport> {
        let path = path.as_ref();
        let (format, columns) = read_columns_from_path(path)?;
        self.ingest(table, path, format, columns.as_slice(), mode)
    }
}
