//! CSV source reading and column projection

use super::{ColumnKind, ColumnSpec, NullMarkers};
use crate::error::{LoadError, Result};

use csv::StringRecord;
use std::path::Path;

/// A fully materialized source file, projected onto a column spec
///
/// Records hold only the projected fields, already in column spec order.
#[derive(Debug)]
pub struct SourceTable {
    kinds: Vec<ColumnKind>,
    records: Vec<StringRecord>,
}

impl SourceTable {
    /// Read a delimited file with a header row and project it onto `columns`
    ///
    /// # Errors
    /// - [`LoadError::SourceRead`] if the file cannot be opened or parsed, or has no header
    /// - [`LoadError::Configuration`] if a column in `columns` is absent from the header
    pub fn read(path: impl AsRef<Path>, columns: &ColumnSpec, nulls: &NullMarkers) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading source {}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| LoadError::source_read(path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| LoadError::source_read(path, e))?
            .clone();
        if headers.is_empty() {
            return Err(LoadError::source_read(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, "missing header row").into(),
            ));
        }

        let indices = project(&headers, columns, path)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| LoadError::source_read(path, e))?;
            records.push(indices.iter().map(|&i| &record[i]).collect::<StringRecord>());
        }

        let kinds = (0..columns.len())
            .map(|i| ColumnKind::infer(records.iter().map(|r| &r[i]), nulls))
            .collect();

        log::debug!(
            "Read {} row(s) from {} ({} projected column(s))",
            records.len(),
            path.display(),
            columns.len()
        );

        Ok(Self {
            kinds,
            records,
        })
    }

    /// Inferred scalar kind per projected column
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn into_records(self) -> Vec<StringRecord> {
        self.records
    }
}

/// Resolve header positions for each spec column, in spec order
fn project(headers: &StringRecord, columns: &ColumnSpec, path: &Path) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| {
                    LoadError::configuration(format!(
                        "column '{}' not found in header of {} (available: {})",
                        column,
                        path.display(),
                        headers.iter().collect::<Vec<_>>().join(", ")
                    ))
                })
        })
        .collect()
}
