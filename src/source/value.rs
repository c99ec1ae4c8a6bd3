//! Scalar values and missing-value normalization

use std::collections::HashSet;
use std::fmt;

/// Text values that mean "no value" in dataframe-style CSV exports
pub const DEFAULT_NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single parameter bound into an insert statement
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The universal null sentinel
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// The set of source markers coerced to [`Value::Null`]
#[derive(Debug, Clone)]
pub struct NullMarkers {
    markers: HashSet<String>,
}

impl Default for NullMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_NA_MARKERS.iter().copied())
    }
}

impl NullMarkers {
    /// Create a marker set from exact text values
    ///
    /// The empty field is always treated as missing.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut markers: HashSet<String> = markers.into_iter().map(Into::into).collect();
        markers.insert(String::new());
        Self { markers }
    }

    /// Add extra markers on top of the current set
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn is_null(&self, field: &str) -> bool {
        self.markers.contains(field)
    }
}

/// Best-effort scalar type of a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

impl ColumnKind {
    /// Infer the narrowest kind that fits every non-null field
    ///
    /// Columns with no non-null fields are text.
    pub fn infer<'a>(fields: impl IntoIterator<Item = &'a str>, nulls: &NullMarkers) -> Self {
        let mut kind = None;
        for field in fields.into_iter().filter(|f| !nulls.is_null(f)) {
            let field_kind = Self::of(field);
            kind = Some(match (kind, field_kind) {
                (None, k) => k,
                (Some(ColumnKind::Text), _) | (_, ColumnKind::Text) => return ColumnKind::Text,
                (Some(ColumnKind::Float), _) | (_, ColumnKind::Float) => ColumnKind::Float,
                (Some(ColumnKind::Int), ColumnKind::Int) => ColumnKind::Int,
            });
        }
        kind.unwrap_or(ColumnKind::Text)
    }

    fn of(field: &str) -> Self {
        if has_redundant_leading_zero(field) {
            ColumnKind::Text
        } else if field.parse::<i64>().is_ok() {
            ColumnKind::Int
        } else if field.parse::<f64>().is_ok_and(f64::is_finite) {
            ColumnKind::Float
        } else {
            ColumnKind::Text
        }
    }

    /// Convert one field, mapping null markers to [`Value::Null`]
    pub fn parse(self, field: &str, nulls: &NullMarkers) -> Value {
        if nulls.is_null(field) {
            return Value::Null;
        }
        match self {
            ColumnKind::Int => field
                .parse()
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(field.to_string())),
            ColumnKind::Float => field
                .parse()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Text(field.to_string())),
            ColumnKind::Text => Value::Text(field.to_string()),
        }
    }
}

// Identifiers such as zip prefixes keep their leading zeros as text.
fn has_redundant_leading_zero(field: &str) -> bool {
    let digits = field.strip_prefix('-').unwrap_or(field).as_bytes();
    digits.len() > 1 && digits[0] == b'0' && digits[1].is_ascii_digit()
}
