//! Raw table registry
//!
//! Every loader is the same pipeline parameterized by a [`TableSpec`]. The
//! five e-commerce raw tables are built in; a YAML manifest can replace them.
//!
//! Example manifest:
//! ```yaml
//! tables:
//!   - name: customers
//!     table: customers_raw
//!     columns:
//!       - customer_id
//!       - customer_city
//! ```

use crate::db::InsertStatement;
use crate::source::ColumnSpec;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN: &[(&str, &str, &[&str])] = &[
    (
        "customers",
        "customers_raw",
        &[
            "customer_id",
            "customer_unique_id",
            "customer_zip_code_prefix",
            "customer_city",
            "customer_state",
        ],
    ),
    (
        "orders",
        "orders_raw",
        &[
            "order_id",
            "customer_id",
            "order_status",
            "order_purchase_timestamp",
            "order_approved_at",
            "order_delivered_carrier_date",
            "order_delivered_customer_date",
            "order_estimated_delivery_date",
        ],
    ),
    (
        "order_items",
        "order_items_raw",
        &[
            "order_id",
            "order_item_id",
            "product_id",
            "seller_id",
            "shipping_limit_date",
            "price",
            "freight_value",
        ],
    ),
    (
        "products",
        "products_raw",
        &[
            "product_id",
            "product_category_name",
            "product_name_lenght",
            "product_description_lenght",
            "product_photos_qty",
            "product_weight_g",
            "product_length_cm",
            "product_height_cm",
            "product_width_cm",
        ],
    ),
    (
        "reviews",
        "reviews_raw",
        &[
            "review_id",
            "order_id",
            "review_score",
            "review_comment_title",
            "review_comment_message",
            "review_creation_date",
            "review_answer_timestamp",
        ],
    ),
];

/// One destination table and the source columns loaded into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Short name used on the command line
    pub name: String,
    /// Destination table
    pub table: String,
    pub columns: ColumnSpec,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, table: impl Into<String>, columns: ColumnSpec) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns,
        }
    }

    /// Build the insert statement for this table
    pub fn statement(&self) -> crate::Result<InsertStatement> {
        InsertStatement::new(&self.table, &self.columns)
    }
}

/// Named set of table specs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegistry {
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl TableRegistry {
    /// The five e-commerce raw tables
    pub fn builtin() -> Self {
        let tables = BUILTIN
            .iter()
            .map(|(name, table, columns)| {
                TableSpec::new(*name, *table, ColumnSpec::new(columns.iter().copied()))
            })
            .collect();
        Self { tables }
    }

    /// Read a registry from a YAML manifest and validate it
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tables manifest: {}", path.display()))?;

        let registry: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse tables manifest YAML: {}", path.display()))?;
        registry.validate()?;

        log::debug!(
            "Loaded {} table(s) from {}",
            registry.count(),
            path.display()
        );
        Ok(registry)
    }

    /// Check names are unique and every statement can be built
    pub fn validate(&self) -> Result<()> {
        for (i, spec) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|s| s.name == spec.name) {
                eyre::bail!("Table '{}' is defined more than once", spec.name);
            }
            spec.statement()
                .with_context(|| format!("Invalid definition for table '{}'", spec.name))?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn count(&self) -> usize {
        self.tables.len()
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_tables() {
        let registry = TableRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["customers", "orders", "order_items", "products", "reviews"]
        );
        registry.validate().unwrap();

        let orders = registry.get("orders").unwrap();
        assert_eq!(orders.table, "orders_raw");
        assert_eq!(orders.columns.len(), 8);

        let products = registry.get("products").unwrap();
        assert_eq!(products.statement().unwrap().arity(), 9);
        assert!(products.columns.iter().any(|c| c == "product_name_lenght"));

        assert!(registry.get("sellers").is_none());
    }

    #[test]
    fn test_builtin_statement() {
        let registry = TableRegistry::builtin();
        let stmt = registry.get("customers").unwrap().statement().unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT IGNORE INTO customers_raw (customer_id, customer_unique_id, \
             customer_zip_code_prefix, customer_city, customer_state) VALUES (?, ?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_read_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "tables:\n  - name: sellers\n    table: sellers_raw\n    columns:\n      - seller_id\n      - seller_city\n"
        )
        .unwrap();

        let registry = TableRegistry::read(file.path()).unwrap();
        assert_eq!(registry.count(), 1);
        let sellers = registry.get("sellers").unwrap();
        assert_eq!(sellers.columns, ColumnSpec::new(["seller_id", "seller_city"]));
    }

    #[test]
    fn test_manifest_rejects_bad_identifier() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "tables:\n  - name: bad\n    table: \"raw; DROP TABLE x\"\n    columns: [id]\n"
        )
        .unwrap();

        let err = TableRegistry::read(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid table name"));
    }

    #[test]
    fn test_manifest_rejects_duplicate_names() {
        let registry = TableRegistry {
            tables: vec![
                TableSpec::new("a", "a_raw", ColumnSpec::new(["id"])),
                TableSpec::new("a", "b_raw", ColumnSpec::new(["id"])),
            ],
        };
        assert!(registry.validate().is_err());
    }
}
