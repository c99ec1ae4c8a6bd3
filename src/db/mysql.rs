//! MySQL destination backed by sqlx

use super::{Connection, ConnectionProvider, DbConfig, InsertStatement};
use crate::source::{Row, Value};

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::query_builder::Separated;
use sqlx::{Connection as SqlxConnection, MySql, QueryBuilder};

/// Opens one MySQL session per load from an explicit [`DbConfig`]
#[derive(Debug, Clone)]
pub struct MySqlProvider {
    config: DbConfig,
}

impl MySqlProvider {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    fn connect_options(&self) -> MySqlConnectOptions {
        let c = &self.config;
        MySqlConnectOptions::new()
            .host(&c.host)
            .port(c.port)
            .username(&c.user)
            .password(&c.password)
            .database(&c.database)
            .charset(&c.charset)
    }
}

impl ConnectionProvider for MySqlProvider {
    type Connection = MySqlSession;
    type Error = sqlx::Error;

    async fn acquire(&self) -> Result<MySqlSession, sqlx::Error> {
        log::debug!("Connecting to {}", self.config);
        let mut conn = MySqlConnection::connect_with(&self.connect_options()).await?;

        // Statements stay in an open transaction until COMMIT or ROLLBACK
        sqlx::Executor::execute(&mut conn, "SET autocommit = 0").await?;

        Ok(MySqlSession { conn })
    }
}

/// A single MySQL connection with autocommit disabled
pub struct MySqlSession {
    conn: MySqlConnection,
}

impl Connection for MySqlSession {
    type Error = sqlx::Error;

    async fn execute(&mut self, statement: &InsertStatement, params: &Row) -> Result<u64, sqlx::Error> {
        self.execute_many(statement, std::slice::from_ref(params)).await
    }

    /// Binds the rows into multi-row `INSERT IGNORE ... VALUES (...), (...)`
    ///
    /// Batches wider than [`InsertStatement::rows_per_statement`] run as
    /// several statements in the same open transaction.
    async fn execute_many(&mut self, statement: &InsertStatement, rows: &[Row]) -> Result<u64, sqlx::Error> {
        let mut affected = 0;
        for chunk in rows.chunks(statement.rows_per_statement()) {
            log::debug!(
                "Executing {} ({} row(s), {} placeholder(s))",
                statement,
                chunk.len(),
                chunk.len() * statement.arity()
            );
            let mut builder = insert_query(statement, chunk);
            let result = builder.build().execute(&mut self.conn).await?;
            affected += result.rows_affected();
        }
        Ok(affected)
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        sqlx::Executor::execute(&mut self.conn, "COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        sqlx::Executor::execute(&mut self.conn, "ROLLBACK").await?;
        Ok(())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}

fn insert_query<'args>(statement: &InsertStatement, rows: &'args [Row]) -> QueryBuilder<'args, MySql> {
    let mut builder = QueryBuilder::<MySql>::new(statement.prefix());
    builder.push_values(rows, |mut values, row| {
        for value in row {
            bind(&mut values, value);
        }
    });
    builder
}

fn bind<'args>(values: &mut Separated<'_, 'args, MySql, &'static str>, value: &'args Value) {
    match value {
        Value::Null => values.push_bind(None::<String>),
        Value::Int(i) => values.push_bind(*i),
        Value::Float(x) => values.push_bind(*x),
        Value::Text(s) => values.push_bind(s.as_str()),
    };
}
