//! SQL dialects and their identifier formatting.
//!
//! A [`Dialect`] selects a [`Formatter`], which decides how tables and
//! columns are quoted and whether `TOP` or `LIMIT` is emitted. Every builder is
//! bound to exactly one dialect when it is created.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::OrmError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    /// No identifier quoting; honors both `TOP` and `LIMIT`.
    #[default]
    Generic,
    /// `[x]` quoting; `TOP n`, `LIMIT` ignored.
    SqlServer,
    /// `"x"` quoting; `LIMIT n`, `TOP` ignored.
    Postgres,
    /// `` `x` `` quoting; `LIMIT n`, `TOP` ignored.
    MySql,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 4] = [
        Dialect::Generic,
        Dialect::SqlServer,
        Dialect::Postgres,
        Dialect::MySql,
    ];

    pub fn formatter(&self) -> &'static dyn Formatter {
        match self {
            Dialect::Generic => &GenericFormatter,
            Dialect::SqlServer => &SqlServerFormatter,
            Dialect::Postgres => &PostgresFormatter,
            Dialect::MySql => &MySqlFormatter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::SqlServer => "sqlserver",
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "ansi" => Ok(Dialect::Generic),
            "sqlserver" | "sql_server" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            other => Err(OrmError::Config(format!("unknown dialect '{other}'"))),
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = OrmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Per-dialect rendering rules.
pub trait Formatter: Send + Sync {
    /// Quote a table name.
    fn table(&self, table: &str) -> String;

    /// Quote a column name.
    fn column(&self, column: &str) -> String;

    /// Whether `TOP n` is rendered after `SELECT`.
    fn supports_top(&self) -> bool;

    /// Whether a trailing `LIMIT n` is rendered.
    fn supports_limit(&self) -> bool;

    /// `table.column`, both quoted.
    fn table_column(&self, table: &str, column: &str) -> String {
        format!("{}.{}", self.table(table), self.column(column))
    }

    /// Placeholder for a named parameter.
    fn parameter(&self, name: &str) -> String {
        format!("@{name}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFormatter;

impl Formatter for GenericFormatter {
    fn table(&self, table: &str) -> String {
        table.to_string()
    }

    fn column(&self, column: &str) -> String {
        column.to_string()
    }

    fn supports_top(&self) -> bool {
        true
    }

    fn supports_limit(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerFormatter;

impl Formatter for SqlServerFormatter {
    fn table(&self, table: &str) -> String {
        format!("[{table}]")
    }

    fn column(&self, column: &str) -> String {
        format!("[{column}]")
    }

    fn supports_top(&self) -> bool {
        true
    }

    fn supports_limit(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresFormatter;

impl Formatter for PostgresFormatter {
    fn table(&self, table: &str) -> String {
        format!("\"{table}\"")
    }

    fn column(&self, column: &str) -> String {
        format!("\"{column}\"")
    }

    fn supports_top(&self) -> bool {
        false
    }

    fn supports_limit(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlFormatter;

impl Formatter for MySqlFormatter {
    fn table(&self, table: &str) -> String {
        format!("`{table}`")
    }

    fn column(&self, column: &str) -> String {
        format!("`{column}`")
    }

    fn supports_top(&self) -> bool {
        false
    }

    fn supports_limit(&self) -> bool {
        true
    }
}
