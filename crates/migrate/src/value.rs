//! Typed SQL values and result rows
//!
//! `SqlValue` is the engine-independent value representation used for column
//! defaults and raw query results. `Row` is an ordered mapping from column
//! name to value as returned by `query`/`fetch_row`.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

/// Engine-independent SQL value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
    DateTime(chrono::DateTime<chrono::Utc>),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    Json(JsonValue),
    /// A raw SQL expression rendered verbatim (e.g. `CURRENT_TIMESTAMP`).
    /// Only meaningful as a column default; never bound as a parameter.
    Expression(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Convert to a JSON value for serialization and test assertions
    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::Null => JsonValue::Null,
            SqlValue::Bool(b) => JsonValue::Bool(*b),
            SqlValue::Int32(i) => JsonValue::Number(serde_json::Number::from(*i)),
            SqlValue::Int64(i) => JsonValue::Number(serde_json::Number::from(*i)),
            SqlValue::Float32(f) => serde_json::Number::from_f64(*f as f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            SqlValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            SqlValue::String(s) => JsonValue::String(s.clone()),
            SqlValue::Bytes(b) => JsonValue::Array(
                b.iter()
                    .map(|&x| JsonValue::Number(serde_json::Number::from(x)))
                    .collect(),
            ),
            SqlValue::Uuid(u) => JsonValue::String(u.to_string()),
            SqlValue::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            SqlValue::Date(d) => JsonValue::String(d.to_string()),
            SqlValue::Time(t) => JsonValue::String(t.to_string()),
            SqlValue::Json(j) => j.clone(),
            SqlValue::Expression(e) => JsonValue::String(e.clone()),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float64(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<uuid::Uuid> for SqlValue {
    fn from(value: uuid::Uuid) -> Self {
        SqlValue::Uuid(value)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::DateTime(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// One result row: column names in select order plus a name → value map
#[derive(Debug, Clone, Default)]
pub struct Row {
    columns: Vec<String>,
    values: HashMap<String, SqlValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column value, preserving select order
    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        let name = name.into();
        if !self.values.contains_key(&name) {
            self.columns.push(name.clone());
        }
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.values.get(name)
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in select order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .filter_map(move |c| self.values.get(c).map(|v| (c.as_str(), v)))
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_preserves_column_order() {
        let mut row = Row::new();
        row.push("b", SqlValue::Int32(2));
        row.push("a", SqlValue::Int32(1));
        assert_eq!(row.column_names(), &["b".to_string(), "a".to_string()]);
        assert_eq!(row.get("a"), Some(&SqlValue::Int32(1)));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn option_converts_to_null() {
        let value: SqlValue = Option::<i32>::None.into();
        assert!(value.is_null());
    }
}
