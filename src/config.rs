//! Warehouse settings shared by every ingestion call.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;
use crate::types::{ConnectionDescriptor, QualifiedTableName};

/// Default target database for created tables.
pub const DEFAULT_DATABASE: &str = "sales_db_object";
/// Default location the input file is assumed to be staged under.
pub const DEFAULT_STAGING_PREFIX: &str = "/path";
/// Default connection descriptor.
pub const DEFAULT_CONNECTION: &str = "DSN=hive";

/// Where tables live and how to reach the engine.
///
/// Missing keys in a JSON config fall back to the defaults above:
///
/// ```json
/// { "connection": "DSN=hive", "database": "sales_db_object", "staging_prefix": "/landing" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WarehouseConfig {
    /// Passed through untouched to the engine's connect call.
    pub connection: ConnectionDescriptor,
    /// Schema (database) that qualifies every table name.
    pub database: String,
    /// Prefix joined with the input file's base name in `LOAD DATA INPATH`.
    pub staging_prefix: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionDescriptor::new(DEFAULT_CONNECTION),
            database: DEFAULT_DATABASE.to_string(),
            staging_prefix: DEFAULT_STAGING_PREFIX.to_string(),
        }
    }
}

impl WarehouseConfig {
    /// Load a config from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> IngestionResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Qualify `table` with the configured database.
    pub fn qualify(&self, table: &str) -> QualifiedTableName {
        QualifiedTableName::new(&self.database, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = WarehouseConfig::from_json_str(r#"{"staging_prefix":"/landing"}"#).unwrap();
        assert_eq!(cfg.staging_prefix, "/landing");
        assert_eq!(cfg.database, DEFAULT_DATABASE);
        assert_eq!(cfg.connection.as_str(), DEFAULT_CONNECTION);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WarehouseConfig::from_json_str(r#"{"dsn":"x"}"#).unwrap_err();
        assert!(err.to_string().starts_with("config error:"));
    }

    #[test]
    fn qualify_uses_database() {
        let cfg = WarehouseConfig::default();
        assert_eq!(cfg.qualify("orders").to_string(), "sales_db_object.orders");
    }
}
