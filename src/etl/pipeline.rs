//! Pipeline orchestration for batched loads

use super::Loader;
use crate::error::{LoadError, Result};
use crate::report::{BatchOutcome, LoadReport};
use crate::source::{Batch, Row};

/// Drives a batch sequence into a [`Loader`], one batch at a time
///
/// Batches run strictly in order. The first failing batch stops the run;
/// later batches are never pulled from the sequence.
///
/// # Example
/// ```no_run
/// # use rawload::etl::{Loader, Pipeline};
/// # use rawload::source::{Batch, Row};
/// # use std::convert::Infallible;
/// # struct MyLoader;
/// # impl Loader for MyLoader {
/// #     type Item = Row;
/// #     type Error = Infallible;
/// #     async fn load(&mut self, items: &[Row]) -> Result<u64, Infallible> { Ok(items.len() as u64) }
/// # }
/// # async fn example(batches: Vec<Batch>) -> rawload::Result<()> {
/// let report = Pipeline::new("customers_raw", batches, MyLoader).run().await?;
/// println!("Inserted {} rows", report.rows_affected());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<I, L> {
    table: String,
    batches: I,
    loader: L,
}

impl<I, L> Pipeline<I, L>
where
    I: IntoIterator<Item = Batch>,
    L: Loader<Item = Row>,
{
    /// Create a new pipeline writing into `table`
    pub fn new(table: impl Into<String>, batches: I, loader: L) -> Self {
        Self {
            table: table.into(),
            batches,
            loader,
        }
    }

    /// Run every batch through the loader
    ///
    /// Empty batches are skipped without reaching the loader.
    ///
    /// # Errors
    /// Returns [`LoadError::BatchExecution`] for the first batch the loader
    /// rejects, with the progress committed before it.
    pub async fn run(self) -> Result<LoadReport> {
        let Self {
            table,
            batches,
            mut loader,
        } = self;
        let mut report = LoadReport::new(&table);

        for batch in batches {
            if batch.is_empty() {
                log::debug!("Skipping empty batch {}", batch.index);
                continue;
            }

            match loader.load(&batch.rows).await {
                Ok(affected) => {
                    log::info!(
                        "Inserted {} rows into {} (batch {}, rows {}..{})",
                        affected,
                        table,
                        batch.index + 1,
                        batch.offset + 1,
                        batch.offset + batch.len()
                    );
                    report.record(BatchOutcome {
                        index: batch.index,
                        offset: batch.offset,
                        rows: batch.len(),
                        affected,
                    });
                }
                Err(e) => {
                    log::error!("Batch {} into {} failed: {}", batch.index + 1, table, e);
                    return Err(LoadError::BatchExecution {
                        table,
                        batch: batch.index,
                        committed_batches: report.committed_batches(),
                        rows_committed: report.rows_affected(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(report)
    }
}
