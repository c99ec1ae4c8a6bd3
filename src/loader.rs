//! Batched insert-ignore loading
//!
//! A load reads and validates the source, acquires one connection, runs each
//! batch as its own transaction, and always releases the connection.

use crate::db::{Connection, ConnectionProvider, InsertStatement};
use crate::error::{LoadError, Result};
use crate::etl::{Loader, Pipeline};
use crate::report::LoadReport;
use crate::source::{ColumnSpec, NullMarkers, Row, read_and_batch_with};
use crate::tables::TableSpec;

use std::path::Path;
use std::time::Instant;

/// Default rows per statement
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Commits each batch on success, rolls it back on failure
pub struct TransactionalSink<'c, C> {
    connection: &'c mut C,
    statement: &'c InsertStatement,
}

impl<'c, C: Connection> TransactionalSink<'c, C> {
    pub fn new(connection: &'c mut C, statement: &'c InsertStatement) -> Self {
        Self {
            connection,
            statement,
        }
    }
}

impl<C: Connection> Loader for TransactionalSink<'_, C> {
    type Item = Row;
    type Error = C::Error;

    async fn load(&mut self, items: &[Row]) -> std::result::Result<u64, C::Error> {
        let result = match self.connection.execute_many(self.statement, items).await {
            Ok(affected) => self.connection.commit().await.map(|_| affected),
            Err(e) => Err(e),
        };

        if result.is_err() {
            if let Err(rollback_err) = self.connection.rollback().await {
                log::error!(
                    "Rollback on {} failed: {}",
                    self.statement.table(),
                    rollback_err
                );
            }
        }
        result
    }
}

/// Loads source files into raw tables through one [`ConnectionProvider`]
///
/// # Example
/// ```no_run
/// use rawload::db::{DbConfig, MySqlProvider};
/// use rawload::loader::BatchLoader;
/// use rawload::tables::TableRegistry;
///
/// # async fn example() -> eyre::Result<()> {
/// let loader = BatchLoader::new(MySqlProvider::new(DbConfig::from_env()?));
/// let registry = TableRegistry::builtin();
/// let customers = registry.get("customers").unwrap();
///
/// let report = loader.load_table(customers, "data/olist_customers_dataset.csv").await?;
/// println!("Inserted {} of {} rows", report.rows_affected(), report.rows_read());
/// # Ok(())
/// # }
/// ```
pub struct BatchLoader<P> {
    provider: P,
    batch_size: usize,
    nulls: NullMarkers,
}

impl<P: ConnectionProvider> BatchLoader<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
            nulls: NullMarkers::default(),
        }
    }

    /// Set rows per statement (default 1000)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set which source values count as missing
    pub fn with_null_markers(mut self, nulls: NullMarkers) -> Self {
        self.nulls = nulls;
        self
    }

    /// Load a source file using a registered table definition
    pub async fn load_table(
        &self,
        spec: &TableSpec,
        source_path: impl AsRef<Path>,
    ) -> Result<LoadReport> {
        self.load(source_path, &spec.columns, &spec.table).await
    }

    /// Load `source_path` into `table_name`, one transaction per batch
    ///
    /// Source and configuration errors are raised before a connection is
    /// acquired. Batches committed before a failure stay committed; the
    /// error says how many.
    ///
    /// # Errors
    /// - [`LoadError::SourceRead`] / [`LoadError::Configuration`] before connecting
    /// - [`LoadError::Connection`] if no session can be opened
    /// - [`LoadError::BatchExecution`] for the first failing batch
    pub async fn load(
        &self,
        source_path: impl AsRef<Path>,
        columns: &ColumnSpec,
        table_name: &str,
    ) -> Result<LoadReport> {
        let source_path = source_path.as_ref();
        let started = Instant::now();

        let statement = InsertStatement::new(table_name, columns)?;
        let batches = read_and_batch_with(source_path, columns, self.batch_size, &self.nulls)?;
        log::info!(
            "Loading {} row(s) from {} into {} in {} batch(es) of up to {}",
            batches.remaining_rows(),
            source_path.display(),
            table_name,
            batches.len(),
            self.batch_size
        );
        log::debug!("Statement: {}", statement);

        let mut connection = self
            .provider
            .acquire()
            .await
            .map_err(|e| LoadError::Connection(Box::new(e)))?;

        let result = Pipeline::new(
            table_name,
            batches,
            TransactionalSink::new(&mut connection, &statement),
        )
        .run()
        .await;

        if let Err(e) = self.provider.release(connection).await {
            log::warn!("Failed to close connection for {}: {}", table_name, e);
        }

        let report = result?;
        log::info!(
            "Finished {}: {} row(s) read, {} inserted, {} ignored in {:.2?}",
            table_name,
            report.rows_read(),
            report.rows_affected(),
            report.rows_ignored(),
            started.elapsed()
        );
        Ok(report)
    }
}
