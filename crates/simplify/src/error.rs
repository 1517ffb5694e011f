//! Error types for simplify

use thiserror::Error;

/// Result type alias for simplify operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for building, hydrating and executing statements
#[derive(Debug, Error)]
pub enum OrmError {
    /// A key accessor does not name a registered property of its entity
    #[error("Invalid accessor: `{property}` is not a mapped property of `{entity}`")]
    InvalidAccessor { entity: String, property: String },

    /// A relation member whose declared type cannot receive hydrated rows
    #[error("Unsupported relation shape: member `{member}` has declared type `{declared_type}`")]
    UnsupportedShape {
        member: String,
        declared_type: String,
    },

    /// Missing or malformed entity metadata
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Failure reported by an executor implementation
    #[error("Executor error: {0}")]
    Executor(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create an invalid accessor error
    pub fn invalid_accessor(entity: impl Into<String>, property: impl Into<String>) -> Self {
        Self::InvalidAccessor {
            entity: entity.into(),
            property: property.into(),
        }
    }

    /// Create an unsupported relation shape error
    pub fn unsupported_shape(member: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            member: member.into(),
            declared_type: declared_type.into(),
        }
    }

    /// Create a metadata error
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an executor error
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was raised while configuring, before any I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidAccessor { .. }
                | Self::UnsupportedShape { .. }
                | Self::Metadata(_)
                | Self::Config(_)
        )
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.to_string())
    }
}
