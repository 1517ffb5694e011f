//! Row mapping traits and utilities

use serde::de::DeserializeOwned;

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};

/// One result row as returned by an executor: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    /// Append a column.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Raw value for a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// Try to get a column value, returning `OrmError::Decode` on failure.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "column not present in row"))?;
        T::from_value(column, value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render the row as a JSON object keyed by column name.
    pub fn to_json(&self) -> OrmResult<serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.columns.len());
        for (name, value) in &self.columns {
            map.insert(name.clone(), serde_json::to_value(value)?);
        }
        Ok(serde_json::Value::Object(map))
    }

    /// Deserialize the row into any `serde` type whose field names match the
    /// column names.
    pub fn deserialize<T: DeserializeOwned>(&self) -> OrmResult<T> {
        serde_json::from_value(self.to_json()?)
            .map_err(|e| OrmError::decode("<row>", e.to_string()))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Trait for converting a result row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRow)]`.
///
/// # Example
///
/// ```ignore
/// use simplify::FromRow;
///
/// #[derive(FromRow)]
/// #[simplify(naming = "snake")]
/// struct User {
///     user_id: i64,
///     username: String,
///     email: Option<String>,
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a row into Self
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}
