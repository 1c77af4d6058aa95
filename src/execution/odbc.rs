//! ODBC backend (cargo feature `odbc`).
//!
//! The descriptor is passed verbatim as an ODBC connection string, so both `DSN=hive` and
//! driver-style strings work.

use odbc_api::handles::StatementImpl;
use odbc_api::{ConnectionOptions, Environment, Preallocated};

use crate::error::{IngestionError, IngestionResult};
use crate::types::ConnectionDescriptor;

use super::engine::{Connection, Cursor, QueryEngine};

fn odbc_err(e: odbc_api::Error) -> IngestionError {
    IngestionError::execution(e.to_string())
}

/// Query engine backed by the system ODBC driver manager.
pub struct OdbcEngine {
    env: Environment,
}

impl OdbcEngine {
    /// Allocate an ODBC environment.
    pub fn new() -> IngestionResult<Self> {
        let env = Environment::new().map_err(odbc_err)?;
        Ok(Self { env })
    }
}

impl QueryEngine for OdbcEngine {
    type Connection<'e> = OdbcConnection<'e>;

    fn connect(&self, descriptor: &ConnectionDescriptor) -> IngestionResult<OdbcConnection<'_>> {
        let conn = self
            .env
            .connect_with_connection_string(descriptor.as_str(), ConnectionOptions::default())
            .map_err(odbc_err)?;
        conn.set_autocommit(true).map_err(odbc_err)?;
        Ok(OdbcConnection { conn })
    }
}

/// Autocommitting ODBC connection.
pub struct OdbcConnection<'e> {
    conn: odbc_api::Connection<'e>,
}

impl Connection for OdbcConnection<'_> {
    type Cursor<'c>
        = OdbcCursor<'c>
    where
        Self: 'c;

    fn cursor(&mut self) -> IngestionResult<OdbcCursor<'_>> {
        let stmt = self.conn.preallocate().map_err(odbc_err)?;
        Ok(OdbcCursor { stmt })
    }

    fn close(self) -> IngestionResult<()> {
        // Disconnect happens when the handle is dropped.
        drop(self.conn);
        Ok(())
    }
}

/// Preallocated ODBC statement handle.
pub struct OdbcCursor<'c> {
    stmt: Preallocated<StatementImpl<'c>>,
}

impl Cursor for OdbcCursor<'_> {
    fn execute(&mut self, sql: &str) -> IngestionResult<()> {
        self.stmt.execute(sql, ()).map_err(odbc_err)?;
        Ok(())
    }

    fn close(self) -> IngestionResult<()> {
        drop(self.stmt);
        Ok(())
    }
}
