//! Dialect-neutral parameter values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{OrmError, OrmResult};

/// A value bound to a named `@parameter`.
///
/// Executors translate these into whatever their driver expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type label used in decode errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Json(_) => "json",
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_uint {
    ($($t:ty),*) => {
        $(
            /// Values above `i64::MAX` are carried as decimal text.
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    i64::try_from(v).map_or_else(|_| Value::Text(v.to_string()), Value::Int)
                }
            }
        )*
    };
}

impl_from_wide_uint!(u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v.and_utc())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Conversion from a bound or fetched [`Value`] back into a Rust type.
pub trait FromValue: Sized {
    /// Convert `value`, read from `column`, into `Self`.
    fn from_value(column: &str, value: &Value) -> OrmResult<Self>;
}

fn mismatch(column: &str, expected: &str, got: &Value) -> OrmError {
    OrmError::decode(column, format!("expected {expected}, found {}", got.kind()))
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
                    match value {
                        Value::Int(v) => <$t>::try_from(*v).map_err(|e| {
                            OrmError::decode(column, format!("{v} out of range: {e}"))
                        }),
                        other => Err(mismatch(column, stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_value_wide_uint {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
                    match value {
                        Value::Int(v) => <$t>::try_from(*v).map_err(|e| {
                            OrmError::decode(column, format!("{v} out of range: {e}"))
                        }),
                        Value::Text(s) => s.parse::<$t>().map_err(|e| {
                            OrmError::decode(column, format!("{s:?} is not a {}: {e}", stringify!($t)))
                        }),
                        other => Err(mismatch(column, stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_wide_uint!(u64, usize);

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Bool(v) => Ok(*v),
            Value::Int(v) => Ok(*v != 0),
            other => Err(mismatch(column, "bool", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(mismatch(column, "f64", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        f64::from_value(column, value).map(|v| v as f32)
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(mismatch(column, "text", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Bytes(v) => Ok(v.clone()),
            other => Err(mismatch(column, "bytes", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Uuid(v) => Ok(*v),
            Value::Text(s) => Uuid::parse_str(s).map_err(|e| OrmError::decode(column, e.to_string())),
            other => Err(mismatch(column, "uuid", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Timestamp(v) => Ok(*v),
            Value::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| OrmError::decode(column, e.to_string())),
            other => Err(mismatch(column, "timestamp", other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        DateTime::<Utc>::from_value(column, value).map(|dt| dt.naive_utc())
    }
}

impl FromValue for serde_json::Value {
    fn from_value(_column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            other => Ok(serde_json::to_value(other)?),
        }
    }
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> OrmResult<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
