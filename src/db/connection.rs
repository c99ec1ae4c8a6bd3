//! Destination session traits

use super::InsertStatement;
use crate::source::Row;

use std::future::Future;

/// One logical session to the destination store
///
/// Statements run inside an open transaction that only [`commit`] or
/// [`rollback`] ends. A connection is owned by a single load.
///
/// [`commit`]: Connection::commit
/// [`rollback`]: Connection::rollback
pub trait Connection: Send + Sized {
    /// Driver error type
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute the statement for a single row, returning rows affected
    fn execute(
        &mut self,
        statement: &InsertStatement,
        params: &Row,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Execute the statement for every row as one operation
    ///
    /// The default runs [`execute`](Connection::execute) per row and sums the
    /// counts; drivers should override it with a single multi-row statement.
    fn execute_many(
        &mut self,
        statement: &InsertStatement,
        rows: &[Row],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send {
        async move {
            let mut affected = 0;
            for row in rows {
                affected += self.execute(statement, row).await?;
            }
            Ok(affected)
        }
    }

    fn commit(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn rollback(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// End the session
    fn close(self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Source of destination sessions
pub trait ConnectionProvider: Send + Sync {
    type Connection: Connection;

    /// Error raised when no session can be established
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a new session
    fn acquire(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;

    /// Give a session back; the default closes it
    fn release(
        &self,
        connection: Self::Connection,
    ) -> impl Future<Output = Result<(), <Self::Connection as Connection>::Error>> + Send {
        connection.close()
    }
}
