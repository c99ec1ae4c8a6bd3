//! Source reading and batching
//!
//! Reads a delimited file fully into memory, projects it onto a column spec,
//! normalizes missing values, and hands out fixed-size batches lazily.

mod batch;
mod reader;
mod value;

pub use batch::{Batch, Batches, Row, RowNormalizer, read_and_batch, read_and_batch_with};
pub use reader::SourceTable;
pub use value::{ColumnKind, DEFAULT_NA_MARKERS, NullMarkers, Value};

use serde::{Deserialize, Serialize};

/// Ordered list of source columns mapped onto statement placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnSpec(Vec<String>);

impl ColumnSpec {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(columns.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ColumnSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
