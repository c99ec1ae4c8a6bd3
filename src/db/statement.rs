//! Insert-ignore statement construction

use crate::error::{LoadError, Result};
use crate::source::ColumnSpec;

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Server limit on bound parameters in one prepared statement
pub const MAX_PLACEHOLDERS: usize = 65_535;

/// Check that `name` can be spliced into SQL as a bare identifier
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// `INSERT IGNORE INTO <table> (<columns>) VALUES (?, ...)` for one table
///
/// Table and column names are validated identifiers; values are always bound
/// as positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    columns: ColumnSpec,
}

impl InsertStatement {
    /// Build a statement for `table` with one placeholder per column
    ///
    /// # Errors
    /// Returns [`LoadError::Configuration`] for an invalid table or column
    /// name, an empty column list, or a repeated column.
    pub fn new(table: impl Into<String>, columns: &ColumnSpec) -> Result<Self> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(LoadError::configuration(format!(
                "invalid table name '{}'",
                table
            )));
        }
        if columns.is_empty() {
            return Err(LoadError::configuration(format!(
                "no columns configured for table '{}'",
                table
            )));
        }
        let mut seen = HashSet::new();
        for column in columns {
            if !is_identifier(column) {
                return Err(LoadError::configuration(format!(
                    "invalid column name '{}' for table '{}'",
                    column, table
                )));
            }
            if !seen.insert(column) {
                return Err(LoadError::configuration(format!(
                    "column '{}' listed twice for table '{}'",
                    column, table
                )));
            }
        }
        Ok(Self {
            table,
            columns: columns.clone(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Placeholders per row
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Most rows one execution can bind without exceeding [`MAX_PLACEHOLDERS`]
    pub fn rows_per_statement(&self) -> usize {
        (MAX_PLACEHOLDERS / self.arity()).max(1)
    }

    /// Statement text up to and including `VALUES`, without any row groups
    pub fn prefix(&self) -> String {
        format!(
            "INSERT IGNORE INTO {} ({}) VALUES ",
            self.table,
            self.columns.as_slice().join(", ")
        )
    }

    /// Single-row statement text
    pub fn sql(&self) -> String {
        let placeholders = vec!["?"; self.arity()].join(", ");
        format!("{}({})", self.prefix(), placeholders)
    }
}

impl std::fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_shape() {
        let stmt = InsertStatement::new("customers_raw", &ColumnSpec::new(["customer_id", "customer_city"]))
            .unwrap();
        assert_eq!(
            stmt.sql(),
            "INSERT IGNORE INTO customers_raw (customer_id, customer_city) VALUES (?, ?)"
        );
        assert_eq!(stmt.arity(), 2);
        assert_eq!(stmt.table(), "customers_raw");
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let cols = ColumnSpec::new(["id"]);
        assert!(InsertStatement::new("raw; DROP TABLE x", &cols).is_err());
        assert!(InsertStatement::new("1raw", &cols).is_err());

        let bad_cols = ColumnSpec::new(["id", "name`"]);
        let err = InsertStatement::new("raw", &bad_cols).unwrap_err();
        assert!(matches!(err, LoadError::Configuration(_)));
    }

    #[test]
    fn test_rejects_empty_and_duplicate_columns() {
        assert!(InsertStatement::new("raw", &ColumnSpec::new(Vec::<String>::new())).is_err());
        let err = InsertStatement::new("raw", &ColumnSpec::new(["id", "id"])).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn test_rows_per_statement_stays_under_limit() {
        let products = InsertStatement::new(
            "products_raw",
            &ColumnSpec::new((0..9).map(|i| format!("c{i}"))),
        )
        .unwrap();
        assert_eq!(products.rows_per_statement(), 7281);
        assert!(products.rows_per_statement() * products.arity() <= MAX_PLACEHOLDERS);

        let single = InsertStatement::new("t", &ColumnSpec::new(["id"])).unwrap();
        assert_eq!(single.rows_per_statement(), MAX_PLACEHOLDERS);
    }

    #[test]
    fn test_identifier() {
        assert!(is_identifier("product_name_lenght"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
