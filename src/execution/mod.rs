//! Statement execution with dry-run support.
//!
//! [`Executor::execute`] never fails: connection and execution errors are logged, reported to
//! the observer, and returned as [`ExecutionOutcome::Failed`]. Cursor and connection are held in
//! drop guards so they are released on every path out of a live execution, and an error raised
//! while releasing them is logged and otherwise ignored.

mod engine;
#[cfg(feature = "odbc")]
mod odbc;

use std::sync::Arc;
use std::time::Instant;

use crate::error::{IngestionError, IngestionResult};
use crate::observability::IngestionObserver;
use crate::types::{ConnectionDescriptor, ExecutionMode, GeneratedStatement};

pub use engine::{Connection, Cursor, OfflineEngine, QueryEngine, Unreachable};
#[cfg(feature = "odbc")]
pub use odbc::{OdbcConnection, OdbcCursor, OdbcEngine};

/// What happened to one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Dry run: the statement was surfaced, not executed. `sql` is the statement text.
    Printed { sql: String },
    /// The engine executed the statement.
    Succeeded,
    /// Connecting or executing failed; `message` is the rendered error.
    Failed { message: String },
}

impl ExecutionOutcome {
    /// `true` for [`Self::Printed`] and [`Self::Succeeded`].
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Statement text of a dry run.
    pub fn printed_sql(&self) -> Option<&str> {
        match self {
            Self::Printed { sql } => Some(sql),
            _ => None,
        }
    }
}

/// Runs statements against one engine with one connection descriptor.
///
/// A fresh connection is opened for every live [`Self::execute`] call and closed before it
/// returns; nothing is pooled or shared between calls.
pub struct Executor<'a, E: QueryEngine> {
    engine: &'a E,
    descriptor: ConnectionDescriptor,
    observer: Option<Arc<dyn IngestionObserver>>,
}

impl<'a, E: QueryEngine> Executor<'a, E> {
    pub fn new(engine: &'a E, descriptor: ConnectionDescriptor) -> Self {
        Self {
            engine,
            descriptor,
            observer: None,
        }
    }

    /// Attach an observer for statement outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Execute (or, in [`ExecutionMode::DryRun`], only surface) `statement`.
    pub fn execute(&self, statement: &GeneratedStatement, mode: ExecutionMode) -> ExecutionOutcome {
        if mode == ExecutionMode::DryRun {
            log::info!("dry run, not executing:\n{statement}");
            if let Some(obs) = &self.observer {
                obs.on_statement(statement);
            }
            return ExecutionOutcome::Printed {
                sql: statement.as_str().to_string(),
            };
        }

        let start = Instant::now();
        match self.run_live(statement.as_str()) {
            Ok(()) => {
                log::info!(
                    "{:?} statement executed in {:?}",
                    statement.kind(),
                    start.elapsed()
                );
                if let Some(obs) = &self.observer {
                    obs.on_success(statement);
                }
                ExecutionOutcome::Succeeded
            }
            Err(e) => {
                log::error!("{:?} statement failed: {e}", statement.kind());
                if let Some(obs) = &self.observer {
                    obs.on_failure(statement, &e);
                }
                ExecutionOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn run_live(&self, sql: &str) -> IngestionResult<()> {
        let conn = self.engine.connect(&self.descriptor)?;
        let mut conn = ReleaseOnDrop::new("connection", conn, Connection::close);
        let cursor = conn.get_mut().cursor()?;
        // Declared after `conn`, so the cursor is released first.
        let mut cursor = ReleaseOnDrop::new("cursor", cursor, Cursor::close);
        cursor.get_mut().execute(sql)
    }
}

/// Calls `release` on the wrapped resource when dropped.
struct ReleaseOnDrop<T, F>
where
    F: FnOnce(T) -> IngestionResult<()>,
{
    what: &'static str,
    inner: Option<(T, F)>,
}

impl<T, F> ReleaseOnDrop<T, F>
where
    F: FnOnce(T) -> IngestionResult<()>,
{
    fn new(what: &'static str, resource: T, release: F) -> Self {
        Self {
            what,
            inner: Some((resource, release)),
        }
    }

    fn get_mut(&mut self) -> &mut T {
        match self.inner.as_mut() {
            Some((resource, _)) => resource,
            None => unreachable!("resource is only taken on drop"),
        }
    }
}

impl<T, F> Drop for ReleaseOnDrop<T, F>
where
    F: FnOnce(T) -> IngestionResult<()>,
{
    fn drop(&mut self) {
        if let Some((resource, release)) = self.inner.take() {
            if let Err(e) = release(resource) {
                let e = match e {
                    IngestionError::Cleanup { .. } => e,
                    other => IngestionError::Cleanup {
                        message: other.to_string(),
                    },
                };
                log::warn!("ignoring error while closing {}: {e}", self.what);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatementKind;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal(RefCell<Vec<String>>);

    impl Journal {
        fn push(&self, s: impl Into<String>) {
            self.0.borrow_mut().push(s.into());
        }
    }

    struct ScriptedEngine {
        journal: Rc<Journal>,
        fail_execute: bool,
        fail_close: bool,
    }

    struct ScriptedConnection<'e> {
        engine: &'e ScriptedEngine,
    }

    struct ScriptedCursor<'e> {
        engine: &'e ScriptedEngine,
    }

    impl QueryEngine for ScriptedEngine {
        type Connection<'e> = ScriptedConnection<'e>;

        fn connect(&self, d: &ConnectionDescriptor) -> IngestionResult<ScriptedConnection<'_>> {
            self.journal.push(format!("connect {}", d.as_str()));
            Ok(ScriptedConnection { engine: self })
        }
    }

    impl<'e> Connection for ScriptedConnection<'e> {
        type Cursor<'c>
            = ScriptedCursor<'e>
        where
            Self: 'c;

        fn cursor(&mut self) -> IngestionResult<ScriptedCursor<'e>> {
            self.engine.journal.push("cursor");
            Ok(ScriptedCursor { engine: self.engine })
        }

        fn close(self) -> IngestionResult<()> {
            self.engine.journal.push("close connection");
            if self.engine.fail_close {
                return Err(IngestionError::execution("socket already closed"));
            }
            Ok(())
        }
    }

    impl Cursor for ScriptedCursor<'_> {
        fn execute(&mut self, sql: &str) -> IngestionResult<()> {
            self.engine.journal.push(format!("execute {sql}"));
            if self.engine.fail_execute {
                return Err(IngestionError::execution("table not found"));
            }
            Ok(())
        }

        fn close(self) -> IngestionResult<()> {
            self.engine.journal.push("close cursor");
            if self.engine.fail_close {
                return Err(IngestionError::execution("cursor already closed"));
            }
            Ok(())
        }
    }

    fn engine(fail_execute: bool, fail_close: bool) -> ScriptedEngine {
        ScriptedEngine {
            journal: Rc::new(Journal::default()),
            fail_execute,
            fail_close,
        }
    }

    fn stmt() -> GeneratedStatement {
        GeneratedStatement::new(StatementKind::LoadData, "SELECT 1".to_string())
    }

    #[test]
    fn success_releases_cursor_then_connection() {
        let eng = engine(false, false);
        let out = Executor::new(&eng, "DSN=hive".into()).execute(&stmt(), ExecutionMode::Live);
        assert_eq!(out, ExecutionOutcome::Succeeded);
        assert_eq!(
            *eng.journal.0.borrow(),
            vec![
                "connect DSN=hive",
                "cursor",
                "execute SELECT 1",
                "close cursor",
                "close connection"
            ]
        );
    }

    #[test]
    fn execute_failure_still_releases_everything() {
        let eng = engine(true, false);
        let out = Executor::new(&eng, "DSN=hive".into()).execute(&stmt(), ExecutionMode::Live);
        assert_eq!(
            out,
            ExecutionOutcome::Failed {
                message: "execution failed: table not found".to_string()
            }
        );
        let journal = eng.journal.0.borrow();
        assert_eq!(journal[journal.len() - 2..], ["close cursor", "close connection"]);
    }

    #[test]
    fn release_failure_does_not_mask_primary_outcome() {
        let eng = engine(true, true);
        let out = Executor::new(&eng, "DSN=hive".into()).execute(&stmt(), ExecutionMode::Live);
        assert_eq!(
            out,
            ExecutionOutcome::Failed {
                message: "execution failed: table not found".to_string()
            }
        );

        let eng = engine(false, true);
        let out = Executor::new(&eng, "DSN=hive".into()).execute(&stmt(), ExecutionMode::Live);
        assert_eq!(out, ExecutionOutcome::Succeeded);
    }

    #[test]
    fn dry_run_never_connects() {
        let eng = engine(true, true);
        let out = Executor::new(&eng, ConnectionDescriptor::new("")).execute(&stmt(), ExecutionMode::DryRun);
        assert_eq!(out.printed_sql(), Some("SELECT 1"));
        assert!(eng.journal.0.borrow().is_empty());
    }

    struct CapturingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger {
        lines: Mutex::new(Vec::new()),
    };

    #[test]
    fn dry_run_without_observer_still_surfaces_sql() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let stmt = GeneratedStatement::new(
            StatementKind::CreateTable,
            "CREATE TABLE IF NOT EXISTS db.dry_run_only (\n    a STRING\n)".to_string(),
        );
        let out = Executor::new(&OfflineEngine, "DSN=hive".into()).execute(&stmt, ExecutionMode::DryRun);

        assert_eq!(out.printed_sql(), Some(stmt.as_str()));
        let lines = LOGGER.lines.lock().unwrap();
        assert!(lines.iter().any(|l| l.contains("db.dry_run_only (\n    a STRING\n)")));
    }

    #[test]
    fn offline_engine_reports_failure() {
        let out = Executor::new(&OfflineEngine, "DSN=hive".into()).execute(&stmt(), ExecutionMode::Live);
        assert!(!out.is_ok());
    }
}
