//! Lazy batching of projected source rows

use super::{ColumnKind, ColumnSpec, NullMarkers, SourceTable, Value};
use crate::error::{LoadError, Result};
use crate::etl::Transformer;

use csv::StringRecord;
use std::convert::Infallible;
use std::path::Path;

/// One source row's parameters, in column spec order
pub type Row = Vec<Value>;

/// A contiguous window of source rows bound into one statement execution
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Zero-based batch number within the load
    pub index: usize,
    /// Source row offset of the first row (header excluded)
    pub offset: usize,
    pub rows: Vec<Row>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Turns projected source records into typed, null-normalized rows
pub struct RowNormalizer {
    kinds: Vec<ColumnKind>,
    nulls: NullMarkers,
}

impl RowNormalizer {
    pub fn new(kinds: Vec<ColumnKind>, nulls: NullMarkers) -> Self {
        Self { kinds, nulls }
    }
}

impl Transformer for RowNormalizer {
    type Input = StringRecord;
    type Output = Row;
    type Error = Infallible;

    fn transform(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        Ok(input
            .iter()
            .zip(&self.kinds)
            .map(|(field, kind)| kind.parse(field, &self.nulls))
            .collect())
    }
}

/// Lazy, non-restartable sequence of batches over a source table
///
/// Each batch is normalized only when it is pulled.
pub struct Batches {
    records: std::vec::IntoIter<StringRecord>,
    normalizer: RowNormalizer,
    batch_size: usize,
    next_index: usize,
    offset: usize,
}

impl Batches {
    /// Batch a source table into windows of `batch_size` rows
    ///
    /// # Errors
    /// Returns [`LoadError::Configuration`] if `batch_size` is zero.
    pub fn new(table: SourceTable, nulls: NullMarkers, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(LoadError::configuration("batch size must be at least 1"));
        }
        let normalizer = RowNormalizer::new(table.kinds().to_vec(), nulls);
        Ok(Self {
            records: table.into_records().into_iter(),
            normalizer,
            batch_size,
            next_index: 0,
            offset: 0,
        })
    }

    /// Rows not yet handed out
    pub fn remaining_rows(&self) -> usize {
        self.records.len()
    }
}

impl Iterator for Batches {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let window: Vec<StringRecord> = self.records.by_ref().take(self.batch_size).collect();
        if window.is_empty() {
            return None;
        }
        let Ok(rows) = self.normalizer.transform_many(window);
        let batch = Batch {
            index: self.next_index,
            offset: self.offset,
            rows,
        };
        self.next_index += 1;
        self.offset += batch.len();
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining_rows().div_ceil(self.batch_size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Batches {}

/// Read a source file and batch it onto a column spec
///
/// Uses the default NA marker set. See [`read_and_batch_with`] for custom markers.
pub fn read_and_batch(
    source_path: impl AsRef<Path>,
    columns: &ColumnSpec,
    batch_size: usize,
) -> Result<Batches> {
    read_and_batch_with(source_path, columns, batch_size, &NullMarkers::default())
}

/// Read a source file and batch it, treating `nulls` as missing values
///
/// # Errors
/// - [`LoadError::Configuration`] for a zero batch size or a column absent from the source
/// - [`LoadError::SourceRead`] if the file cannot be read
pub fn read_and_batch_with(
    source_path: impl AsRef<Path>,
    columns: &ColumnSpec,
    batch_size: usize,
    nulls: &NullMarkers,
) -> Result<Batches> {
    if batch_size == 0 {
        return Err(LoadError::configuration("batch size must be at least 1"));
    }
    let table = SourceTable::read(source_path, columns, nulls)?;
    Batches::new(table, nulls.clone(), batch_size)
}
