//! Query engine seam.
//!
//! A [`QueryEngine`] turns a [`ConnectionDescriptor`] into a [`Connection`], which hands out
//! [`Cursor`]s. Both levels are released explicitly through `close`, and the executor guarantees
//! that `close` is attempted on every exit path. Connections are expected to be in autocommit
//! mode: each executed statement is its own unit of work.

use crate::error::{IngestionError, IngestionResult};
use crate::types::ConnectionDescriptor;

/// Something that can open connections to a SQL engine.
pub trait QueryEngine {
    type Connection<'e>: Connection
    where
        Self: 'e;

    /// Open a new connection. Blocks until the engine answers.
    fn connect(&self, descriptor: &ConnectionDescriptor) -> IngestionResult<Self::Connection<'_>>;
}

/// An open, autocommitting connection.
pub trait Connection {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Allocate a cursor (statement handle) on this connection.
    fn cursor(&mut self) -> IngestionResult<Self::Cursor<'_>>;

    /// Disconnect.
    fn close(self) -> IngestionResult<()>;
}

/// A statement handle.
pub trait Cursor {
    /// Run one statement to completion. Any result set is discarded.
    fn execute(&mut self, sql: &str) -> IngestionResult<()>;

    /// Free the handle.
    fn close(self) -> IngestionResult<()>;
}

/// Engine used when the crate is built without a live backend.
///
/// Every connect attempt fails with [`IngestionError::Execution`], which the executor reports
/// like any other connection failure. Dry runs are unaffected.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineEngine;

/// Uninhabited connection/cursor type for [`OfflineEngine`].
#[derive(Debug)]
pub enum Unreachable {}

impl QueryEngine for OfflineEngine {
    type Connection<'e> = Unreachable;

    fn connect(&self, _descriptor: &ConnectionDescriptor) -> IngestionResult<Unreachable> {
        Err(IngestionError::execution(
            "no query engine backend available (rebuild with `--features odbc`)",
        ))
    }
}

impl Connection for Unreachable {
    type Cursor<'c> = Unreachable;

    fn cursor(&mut self) -> IngestionResult<Unreachable> {
        match *self {}
    }

    fn close(self) -> IngestionResult<()> {
        match self {}
    }
}

impl Cursor for Unreachable {
    fn execute(&mut self, _sql: &str) -> IngestionResult<()> {
        match *self {}
    }

    fn close(self) -> IngestionResult<()> {
        match self {}
    }
}
