//! Runtime configuration.
//!
//! ```toml
//! dialect = "sqlserver"
//! sql_logging = true
//! max_logged_sql_length = 500
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::builder::{CommandBuilder, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::instrument::{LoggedExecutor, SqlLogger};

/// Dialect selection and SQL logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Dialect every builder created from this config is bound to.
    pub dialect: Dialect,
    /// Emit `simplify.sql` debug events from instrumented executors.
    pub sql_logging: bool,
    /// Truncate logged SQL (in bytes). `None` logs it whole.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Generic,
            sql_logging: true,
            max_logged_sql_length: Some(200),
        }
    }
}

impl SimplifyConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_sql_logging(mut self, enabled: bool) -> Self {
        self.sql_logging = enabled;
        self
    }

    pub fn with_max_logged_sql_length(mut self, len: Option<usize>) -> Self {
        self.max_logged_sql_length = len;
        self
    }

    /// A fresh SELECT builder for the configured dialect.
    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.dialect)
    }

    /// A fresh INSERT/UPDATE builder for the configured dialect.
    pub fn command(&self) -> CommandBuilder {
        CommandBuilder::new(self.dialect)
    }

    pub fn logger(&self) -> SqlLogger {
        SqlLogger {
            enabled: self.sql_logging,
            max_sql_length: self.max_logged_sql_length,
        }
    }

    /// Wrap `executor` so every statement is logged per this config.
    pub fn instrument<E>(&self, executor: E) -> LoggedExecutor<E> {
        LoggedExecutor::new(executor).with_logger(self.logger())
    }
}
