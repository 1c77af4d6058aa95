//! Command-line entry point for the `warehouse-ingest` binary.

use std::env;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::config::WarehouseConfig;
use crate::observability::{CompositeObserver, FileObserver, IngestionObserver, StdOutObserver};
use crate::pipeline::{IngestionReport, Ingestor};
use crate::types::{ConnectionDescriptor, ExecutionMode};

#[derive(Debug, Parser)]
#[command(author, version, about = "Create a warehouse table for a CSV/Parquet file and load it", long_about = None)]
pub struct Cli {
    /// Input file (.csv, .parquet or .pq); must already be staged under the staging prefix
    pub input: PathBuf,
    /// Target table name (qualified with the configured database)
    #[arg(short, long)]
    pub table: String,
    /// JSON config file with `connection`, `database` and `staging_prefix`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Connection descriptor passed to the engine (overrides the config file)
    #[arg(long)]
    pub connection: Option<String>,
    /// Database that qualifies the table name (overrides the config file)
    #[arg(long)]
    pub database: Option<String>,
    /// Staging path prefix used in LOAD DATA INPATH (overrides the config file)
    #[arg(long)]
    pub staging_prefix: Option<String>,
    /// Print the generated statements instead of executing them
    #[arg(long, visible_alias = "verbose")]
    pub dry_run: bool,
    /// Also append one line per ingestion event to this file
    #[arg(long)]
    pub event_log: Option<PathBuf>,
}

impl Cli {
    fn warehouse_config(&self) -> Result<WarehouseConfig> {
        let mut cfg = match &self.config {
            Some(path) => WarehouseConfig::from_json_path(path)
                .with_context(|| format!("Loading config from {path:?}"))?,
            None => WarehouseConfig::default(),
        };
        if let Some(c) = &self.connection {
            cfg.connection = ConnectionDescriptor::new(c.as_str());
        }
        if let Some(db) = &self.database {
            cfg.database = db.clone();
        }
        if let Some(prefix) = &self.staging_prefix {
            cfg.staging_prefix = prefix.clone();
        }
        Ok(cfg)
    }

    fn observer(&self) -> Arc<dyn IngestionObserver> {
        let stdout: Arc<dyn IngestionObserver> = Arc::new(StdOutObserver::default());
        match &self.event_log {
            Some(path) => Arc::new(CompositeObserver::new(vec![
                stdout,
                Arc::new(FileObserver::new(path)),
            ])),
            None => stdout,
        }
    }
}

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("warehouse_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

/// Parse arguments and run one ingestion.
///
/// Reported statement failures are not errors here; only problems that stop the statements
/// from being built (bad config, unreadable or unsupported input) are.
pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cfg = cli.warehouse_config()?;
    let mode = ExecutionMode::from_verbose(cli.dry_run);

    let report = run_with_engine(&cli, cfg, mode)?;
    info!(
        "finished {}: create={:?} load={:?}",
        cli.table, report.create, report.load
    );
    Ok(())
}

#[cfg(feature = "odbc")]
fn run_with_engine(cli: &Cli, cfg: WarehouseConfig, mode: ExecutionMode) -> Result<IngestionReport> {
    let engine = crate::execution::OdbcEngine::new().context("Allocating ODBC environment")?;
    ingest_with(Ingestor::new(cfg, engine), cli, mode)
}

#[cfg(not(feature = "odbc"))]
fn run_with_engine(cli: &Cli, cfg: WarehouseConfig, mode: ExecutionMode) -> Result<IngestionReport> {
    ingest_with(Ingestor::new(cfg, crate::execution::OfflineEngine), cli, mode)
}

fn ingest_with<E: crate::execution::QueryEngine>(
    ingestor: Ingestor<E>,
    cli: &Cli,
    mode: ExecutionMode,
) -> Result<IngestionReport> {
    let ingestor = ingestor.with_observer(cli.observer());
    ingestor
        .ingest_file(&cli.input, &cli.table, mode)
        .with_context(|| format!("Ingesting {:?}", cli.input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn flags_override_config_defaults() {
        let cli = Cli::parse_from([
            "warehouse-ingest",
            "orders.csv",
            "--table",
            "orders",
            "--database",
            "staging",
            "--verbose",
        ]);
        assert!(cli.dry_run);
        let cfg = cli.warehouse_config().unwrap();
        assert_eq!(cfg.database, "staging");
        assert_eq!(cfg.staging_prefix, crate::config::DEFAULT_STAGING_PREFIX);
        assert!(cli.event_log.is_none());
    }

    #[test]
    fn event_log_records_a_dry_run() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let log_path = std::env::temp_dir().join(format!("warehouse-ingest-cli-{nanos}.log"));
        let args: Vec<OsString> = vec![
            "warehouse-ingest".into(),
            "tests/fixtures/orders.csv".into(),
            "--table".into(),
            "orders".into(),
            "--dry-run".into(),
            "--event-log".into(),
            log_path.clone().into_os_string(),
        ];
        let cli = Cli::parse_from(args);

        let cfg = cli.warehouse_config().unwrap();
        let ingestor = Ingestor::new(cfg, crate::execution::OfflineEngine);
        let report = ingest_with(ingestor, &cli, ExecutionMode::DryRun).unwrap();
        assert!(report.is_ok());

        let text = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("start table=sales_db_object.orders format=csv mode=DryRun"));
        assert!(lines[1].contains("dry-run kind=CreateTable"));
        assert!(lines[2].contains("dry-run kind=LoadData sql=LOAD DATA INPATH '/path/orders.csv'"));

        let _ = std::fs::remove_file(&log_path);
    }
}
