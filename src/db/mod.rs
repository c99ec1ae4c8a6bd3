//! Destination store access
//!
//! [`Connection`] and [`ConnectionProvider`] are the seams the loader talks to;
//! [`MySqlProvider`] implements them over sqlx.

mod config;
mod connection;
mod mysql;
mod statement;

pub use config::DbConfig;
pub use connection::{Connection, ConnectionProvider};
pub use mysql::{MySqlProvider, MySqlSession};
pub use statement::{InsertStatement, MAX_PLACEHOLDERS, is_identifier};
