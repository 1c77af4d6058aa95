use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::types::{ExecutionMode, FileFormat, GeneratedStatement, QualifiedTableName};

/// Context about one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    /// Fully qualified target table.
    pub table: QualifiedTableName,
    /// Input file as given by the caller.
    pub input: PathBuf,
    /// Declared storage format.
    pub format: FileFormat,
    /// Dry-run or live.
    pub mode: ExecutionMode,
}

/// Observer interface for ingestion progress and statement outcomes.
///
/// All methods default to no-ops; implementors pick what they care about.
pub trait IngestionObserver: Send + Sync {
    /// Called once before any statement is handed to the executor.
    fn on_ingest_started(&self, _ctx: &IngestionContext) {}

    /// Called in dry-run mode with the statement that would have been executed.
    fn on_statement(&self, _statement: &GeneratedStatement) {}

    /// Called when a statement ran successfully.
    fn on_success(&self, _statement: &GeneratedStatement) {}

    /// Called when connecting or executing failed. The failure is not propagated further.
    fn on_failure(&self, _statement: &GeneratedStatement, _error: &IngestionError) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_ingest_started(&self, ctx: &IngestionContext) {
        for o in &self.observers {
            o.on_ingest_started(ctx);
        }
    }

    fn on_statement(&self, statement: &GeneratedStatement) {
        for o in &self.observers {
            o.on_statement(statement);
        }
    }

    fn on_success(&self, statement: &GeneratedStatement) {
        for o in &self.observers {
            o.on_success(statement);
        }
    }

    fn on_failure(&self, statement: &GeneratedStatement, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(statement, error);
        }
    }
}

/// Prints human-readable progress, to stdout unless another writer is given.
///
/// Dry-run statements are printed in full so they can be copied into a SQL console.
pub struct StdOutObserver {
    out: Mutex<Box<dyn Write + Send>>,
}

impl StdOutObserver {
    /// Print to `out` instead of stdout.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn print(&self, text: fmt::Arguments<'_>) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }
}

impl Default for StdOutObserver {
    fn default() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl fmt::Debug for StdOutObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdOutObserver").finish_non_exhaustive()
    }
}

impl IngestionObserver for StdOutObserver {
    fn on_ingest_started(&self, ctx: &IngestionContext) {
        self.print(format_args!("Ingesting data for table: {}", ctx.table.table));
    }

    fn on_statement(&self, statement: &GeneratedStatement) {
        self.print(format_args!("Query to execute:\n{statement}"));
    }

    fn on_success(&self, _statement: &GeneratedStatement) {
        self.print(format_args!("Query executed successfully."));
    }

    fn on_failure(&self, _statement: &GeneratedStatement, error: &IngestionError) {
        self.print(format_args!("An error occurred: {error}"));
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_ingest_started(&self, ctx: &IngestionContext) {
        self.append_line(&format!(
            "{} start table={} format={} mode={:?} input={}",
            unix_ts(),
            ctx.table,
            ctx.format,
            ctx.mode,
            ctx.input.display()
        ));
    }

    fn on_statement(&self, statement: &GeneratedStatement) {
        self.append_line(&format!(
            "{} dry-run kind={:?} sql={}",
            unix_ts(),
            statement.kind(),
            single_line(statement.as_str())
        ));
    }

    fn on_success(&self, statement: &GeneratedStatement) {
        self.append_line(&format!("{} ok kind={:?}", unix_ts(), statement.kind()));
    }

    fn on_failure(&self, statement: &GeneratedStatement, error: &IngestionError) {
        self.append_line(&format!(
            "{} fail kind={:?} err={}",
            unix_ts(),
            statement.kind(),
            error
        ));
    }
}

fn single_line(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
