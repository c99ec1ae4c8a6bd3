//! rawload
//!
//! Batched insert-ignore loading of e-commerce CSV exports into raw staging tables

pub mod cli;
pub mod db;
pub mod error;
pub mod etl;
pub mod loader;
pub mod report;
pub mod source;
pub mod tables;

// Re-exports for convenience
pub use db::{Connection, ConnectionProvider, DbConfig, InsertStatement, MySqlProvider};
pub use error::{LoadError, Result};
pub use etl::{Loader, Pipeline, Transformer};
pub use loader::{BatchLoader, DEFAULT_BATCH_SIZE, TransactionalSink};
pub use report::{BatchOutcome, LoadReport};
pub use source::{Batch, Batches, ColumnSpec, NullMarkers, Row, Value, read_and_batch};
pub use tables::{TableRegistry, TableSpec};
