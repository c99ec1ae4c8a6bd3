//! Integration tests for loading raw tables
//!
//! These tests run the public loader end to end against CSV files on disk
//! and an in-memory destination with a unique key on the first column.

use rawload::{
    BatchLoader, ColumnSpec, Connection, ConnectionProvider, InsertStatement, LoadError, Row,
    TableRegistry, Value, read_and_batch,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct StoreError(String);

/// Rows keyed by their first value, split into committed and in-flight
#[derive(Default)]
struct Store {
    committed: BTreeMap<String, Row>,
    pending: BTreeMap<String, Row>,
    statements: Vec<String>,
    opened: usize,
    closed: usize,
    /// Reject any row whose first value renders as this text
    poison: Option<String>,
}

#[derive(Clone, Default)]
struct InMemoryDestination(Arc<Mutex<Store>>);

struct InMemorySession(Arc<Mutex<Store>>);

impl Connection for InMemorySession {
    type Error = StoreError;

    // Only single-row execution; multi-row goes through the trait default
    async fn execute(&mut self, statement: &InsertStatement, params: &Row) -> Result<u64, StoreError> {
        let mut store = self.0.lock().unwrap();
        if params.len() != statement.arity() {
            return Err(StoreError(format!(
                "expected {} parameters, got {}",
                statement.arity(),
                params.len()
            )));
        }
        let key = params[0].to_string();
        if store.poison.as_deref() == Some(key.as_str()) {
            return Err(StoreError(format!("cannot insert {}", key)));
        }
        store.statements.push(statement.sql());
        if store.committed.contains_key(&key) || store.pending.contains_key(&key) {
            return Ok(0);
        }
        store.pending.insert(key, params.clone());
        Ok(1)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut store = self.0.lock().unwrap();
        let pending = std::mem::take(&mut store.pending);
        store.committed.extend(pending);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.0.lock().unwrap().pending.clear();
        Ok(())
    }

    async fn close(self) -> Result<(), StoreError> {
        self.0.lock().unwrap().closed += 1;
        Ok(())
    }
}

impl ConnectionProvider for InMemoryDestination {
    type Connection = InMemorySession;
    type Error = StoreError;

    async fn acquire(&self) -> Result<InMemorySession, StoreError> {
        self.0.lock().unwrap().opened += 1;
        Ok(InMemorySession(self.0.clone()))
    }
}

fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const ORDERS_CSV: &str = "\
order_id,customer_id,order_status,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date
e481f51c,9ef432eb,delivered,2017-10-02 10:56:33,2017-10-02 11:07:15,2017-10-04 19:55:00,2017-10-10 21:25:13,2017-10-18 00:00:00
53cdb2fc,b0830fb4,delivered,2018-07-24 20:41:37,2018-07-26 03:24:27,2018-07-26 14:31:00,2018-08-07 15:27:45,2018-08-13 00:00:00
47770eb9,41ce2a54,shipped,2018-08-08 08:38:49,2018-08-08 08:55:23,2018-08-08 13:50:00,,2018-09-04 00:00:00
949d5b44,f8819746,canceled,2017-11-18 19:28:06,,,,2017-12-15 00:00:00
ad21c59c,8ab97904,delivered,2018-02-13 21:18:39,2018-02-13 22:20:29,2018-02-14 19:46:34,2018-02-16 18:17:02,2018-02-26 00:00:00
";

#[tokio::test]
async fn test_orders_end_to_end() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "orders.csv", ORDERS_CSV);
    let registry = TableRegistry::builtin();
    let orders = registry.get("orders").unwrap();

    let destination = InMemoryDestination::default();
    let loader = BatchLoader::new(destination.clone()).with_batch_size(2);
    let report = loader.load_table(orders, &source).await.unwrap();

    assert_eq!(report.rows_read(), 5);
    assert_eq!(report.rows_affected(), 5);
    assert_eq!(report.batches.len(), 3);

    let store = destination.0.lock().unwrap();
    assert_eq!(store.opened, 1);
    assert_eq!(store.closed, 1);
    assert!(store.statements[0].starts_with("INSERT IGNORE INTO orders_raw (order_id, customer_id,"));

    let canceled = &store.committed["\"949d5b44\""];
    assert_eq!(canceled[2], Value::from("canceled"));
    assert_eq!(canceled[4], Value::Null);
    assert_eq!(canceled[5], Value::Null);
    assert_eq!(canceled[6], Value::Null);
    assert_eq!(canceled[7], Value::from("2017-12-15 00:00:00"));
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "orders.csv", ORDERS_CSV);
    let registry = TableRegistry::builtin();
    let orders = registry.get("orders").unwrap();

    let destination = InMemoryDestination::default();
    let loader = BatchLoader::new(destination.clone()).with_batch_size(2);

    loader.load_table(orders, &source).await.unwrap();
    let second = loader.load_table(orders, &source).await.unwrap();

    assert_eq!(second.rows_affected(), 0);
    assert_eq!(second.rows_ignored(), 5);
    assert_eq!(destination.0.lock().unwrap().committed.len(), 5);
}

#[tokio::test]
async fn test_mid_file_failure_keeps_earlier_batches() {
    let dir = TempDir::new().unwrap();
    let mut content = String::from("id,name\n");
    for i in 1..=7 {
        content.push_str(&format!("{},item-{}\n", i, i));
    }
    let source = write_csv(dir.path(), "items.csv", &content);

    let destination = InMemoryDestination::default();
    destination.0.lock().unwrap().poison = Some("4".to_string());
    let loader = BatchLoader::new(destination.clone()).with_batch_size(3);

    let err = loader
        .load(&source, &ColumnSpec::new(["id", "name"]), "items_raw")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LoadError::BatchExecution {
            batch: 1,
            committed_batches: 1,
            rows_committed: 3,
            ..
        }
    ));
    assert!(err.to_string().contains("cannot insert 4"));

    let store = destination.0.lock().unwrap();
    let keys: Vec<&str> = store.committed.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1", "2", "3"]);
    assert!(store.pending.is_empty());
    assert_eq!(store.closed, 1);
}

#[tokio::test]
async fn test_unknown_column_never_connects() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "x.csv", "id,val\n1,a\n");

    let destination = InMemoryDestination::default();
    let loader = BatchLoader::new(destination.clone());

    let err = loader
        .load(&source, &ColumnSpec::new(["foo"]), "x_raw")
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Configuration(_)));
    assert_eq!(destination.0.lock().unwrap().opened, 0);
}

#[test]
fn test_read_and_batch_scenario() {
    let dir = TempDir::new().unwrap();
    let source = write_csv(dir.path(), "s.csv", "id,val\n1,a\n2,NA\n3,c\n");

    let batches: Vec<Vec<Row>> = read_and_batch(&source, &ColumnSpec::new(["id", "val"]), 2)
        .unwrap()
        .map(|b| b.rows)
        .collect();

    assert_eq!(
        batches,
        vec![
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::Null],
            ],
            vec![vec![Value::Int(3), Value::from("c")]],
        ]
    );
}
