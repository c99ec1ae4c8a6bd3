//! CLI helper functions

use crate::{
    db::{ConnectionProvider, DbConfig, MySqlProvider},
    loader::BatchLoader,
    report::LoadReport,
    source::{NullMarkers, read_and_batch_with},
    tables::{TableRegistry, TableSpec},
};
use eyre::{Context, Result};
use std::path::Path;

/// Options shared by `load` invocations
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub batch_size: usize,
    pub nulls: NullMarkers,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: crate::DEFAULT_BATCH_SIZE,
            nulls: NullMarkers::default(),
        }
    }
}

/// Shape of a load without touching the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub rows: usize,
    pub batches: usize,
    pub batch_size: usize,
}

/// Use the manifest at `path` if given, otherwise the built-in tables
pub fn load_registry(path: Option<&Path>) -> Result<TableRegistry> {
    match path {
        Some(path) => {
            log::info!("Loading table definitions from {}", path.display());
            TableRegistry::read(path)
        }
        None => Ok(TableRegistry::builtin()),
    }
}

/// Look up a table by name with a helpful error
pub fn find_table<'r>(registry: &'r TableRegistry, name: &str) -> Result<&'r TableSpec> {
    registry.get(name).ok_or_else(|| {
        eyre::eyre!(
            "Unknown table '{}'. Available tables: {}",
            name,
            registry.names().join(", ")
        )
    })
}

/// Build the MySQL provider from `MYSQL_*` environment variables
pub fn load_mysql_provider() -> Result<MySqlProvider> {
    let config = DbConfig::from_env().context("Failed to read destination settings")?;
    log::info!("Destination: {}", config);
    Ok(MySqlProvider::new(config))
}

/// Load one source file into a registered table
pub async fn load_table<P: ConnectionProvider>(
    provider: P,
    spec: &TableSpec,
    source: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<LoadReport> {
    let source = source.as_ref();
    let loader = BatchLoader::new(provider)
        .with_batch_size(options.batch_size)
        .with_null_markers(options.nulls.clone());

    let report = loader
        .load_table(spec, source)
        .await
        .with_context(|| format!("Failed to load {} into {}", source.display(), spec.table))?;

    Ok(report)
}

/// Read, validate and batch a source file, reporting the plan
pub fn plan_load(
    spec: &TableSpec,
    source: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<BatchPlan> {
    let source = source.as_ref();
    spec.statement()?;
    let batches = read_and_batch_with(source, &spec.columns, options.batch_size, &options.nulls)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let plan = BatchPlan {
        rows: batches.remaining_rows(),
        batches: batches.len(),
        batch_size: options.batch_size,
    };

    // Pull every batch so normalization runs end to end
    let normalized: usize = batches.map(|b| b.len()).sum();
    log::debug!("Normalized {} row(s) from {}", normalized, source.display());

    Ok(plan)
}

/// Open and close one session to verify destination settings
pub async fn check_connection<P: ConnectionProvider>(provider: &P) -> Result<()> {
    let connection = provider
        .acquire()
        .await
        .context("Failed to connect to destination")?;
    provider
        .release(connection)
        .await
        .context("Failed to close destination connection")?;
    Ok(())
}

/// One line per table: name, destination and columns
pub fn describe_tables(registry: &TableRegistry) -> Vec<String> {
    registry
        .tables
        .iter()
        .map(|t| {
            format!(
                "{} -> {} ({})",
                t.name,
                t.table,
                t.columns.as_slice().join(", ")
            )
        })
        .collect()
}
