#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use warehouse_ingest::IngestionError;
use warehouse_ingest::execution::{Connection, Cursor, QueryEngine};
use warehouse_ingest::types::ConnectionDescriptor;

pub fn tmp_file(name: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("warehouse-ingest-{name}-{nanos}.{ext}"))
}

/// In-memory engine that records every call.
#[derive(Default)]
pub struct RecordingEngine {
    pub events: Mutex<Vec<String>>,
    /// Descriptors for which `connect` fails.
    pub unreachable: Vec<String>,
    /// Statements containing this text fail to execute.
    pub fail_when_contains: Option<String>,
}

impl RecordingEngine {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("execute ").map(str::to_string))
            .collect()
    }

    fn push(&self, e: impl Into<String>) {
        self.events.lock().unwrap().push(e.into());
    }
}

pub struct RecordingConnection<'e> {
    engine: &'e RecordingEngine,
}

pub struct RecordingCursor<'e> {
    engine: &'e RecordingEngine,
}

impl QueryEngine for RecordingEngine {
    type Connection<'e> = RecordingConnection<'e>;

    fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<RecordingConnection<'_>, IngestionError> {
        self.push(format!("connect {}", descriptor.as_str()));
        if self.unreachable.iter().any(|d| d == descriptor.as_str()) {
            return Err(IngestionError::Execution {
                message: format!("data source '{}' not found", descriptor.as_str()),
            });
        }
        Ok(RecordingConnection { engine: self })
    }
}

impl<'e> Connection for RecordingConnection<'e> {
    type Cursor<'c>
        = RecordingCursor<'e>
    where
        Self: 'c;

    fn cursor(&mut self) -> Result<RecordingCursor<'e>, IngestionError> {
        Ok(RecordingCursor {
            engine: self.engine,
        })
    }

    fn close(self) -> Result<(), IngestionError> {
        self.engine.push("disconnect");
        Ok(())
    }
}

impl Cursor for RecordingCursor<'_> {
    fn execute(&mut self, sql: &str) -> Result<(), IngestionError> {
        self.engine.push(format!("execute {sql}"));
        match &self.engine.fail_when_contains {
            Some(needle) if sql.contains(needle.as_str()) => Err(IngestionError::Execution {
                message: "AlreadyExistsException: table is locked".to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn close(self) -> Result<(), IngestionError> {
        Ok(())
    }
}
