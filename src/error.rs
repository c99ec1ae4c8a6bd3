//! Error types for loading raw tables

use std::path::PathBuf;

/// Boxed driver error carried by connection and execution failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, LoadError>;

/// Failure of a single load invocation
///
/// Source and configuration problems are raised before a connection is
/// acquired. Execution failures are raised after the failing batch has been
/// rolled back and the connection has been released.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file is missing, unreadable, or malformed
    #[error("Failed to read source {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The table definition does not fit the source or is invalid on its own
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The connection provider could not establish a session
    #[error("Failed to connect to destination: {0}")]
    Connection(#[source] BoxError),

    /// A batch statement failed and was rolled back
    ///
    /// Batches before `batch` stay committed.
    #[error(
        "Batch {} failed on {table} after {committed_batches} committed batch(es) \
         ({rows_committed} row(s) inserted): {source}",
        .batch + 1
    )]
    BatchExecution {
        table: String,
        batch: usize,
        committed_batches: usize,
        rows_committed: u64,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    pub(crate) fn source_read(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether any batch was committed before this error was raised
    pub fn is_partial_load(&self) -> bool {
        matches!(
            self,
            Self::BatchExecution {
                committed_batches, ..
            } if *committed_batches > 0
        )
    }
}
