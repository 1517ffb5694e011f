//! SQL logging around any executor.
//!
//! [`LoggedExecutor`] wraps an [`Executor`] or [`BlockingExecutor`] and emits a
//! `tracing` debug event on target `simplify.sql` before every statement is
//! handed to the inner executor. Events carry `kind` (`query`, `command` or
//! `batch`), `param_count` and the (optionally truncated) `sql`.
//!
//! Enable via the crate feature: `simplify = { features = ["tracing"] }`
//! (on by default). Without it the wrapper is a pass-through.

use std::borrow::Cow;

use crate::builder::Parameters;
use crate::error::OrmResult;
use crate::executor::{BlockingExecutor, BlockingTransaction, Executor, Transaction};
use crate::row::Row;

/// Settings for SQL debug events.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Whether events are emitted at all.
    pub enabled: bool,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            max_sql_length: None,
        }
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn truncate_sql<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max)))
            }
            _ => Cow::Borrowed(sql),
        }
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn log(&self, kind: &'static str, sql: &str, params: &Parameters) {
        #[cfg(feature = "tracing")]
        if self.enabled {
            tracing::debug!(
                target: "simplify.sql",
                kind,
                param_count = params.len(),
                sql = %self.truncate_sql(sql),
            );
        }
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// An executor wrapper that logs every statement before running it.
#[derive(Debug, Clone)]
pub struct LoggedExecutor<E> {
    inner: E,
    logger: SqlLogger,
}

impl<E> LoggedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            logger: SqlLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

/// Transaction of a [`LoggedExecutor`]; statements are logged as `batch`.
#[derive(Debug)]
pub struct LoggedTransaction<'a, T> {
    inner: T,
    logger: &'a SqlLogger,
}

impl<E: Executor> Executor for LoggedExecutor<E> {
    type Tx<'a>
        = LoggedTransaction<'a, E::Tx<'a>>
    where
        Self: 'a;

    async fn query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>> {
        self.logger.log("query", sql, params);
        self.inner.query(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.logger.log("command", sql, params);
        self.inner.execute(sql, params).await
    }

    async fn begin(&self) -> OrmResult<Self::Tx<'_>> {
        let inner = self.inner.begin().await?;
        Ok(LoggedTransaction {
            inner,
            logger: &self.logger,
        })
    }
}

impl<T: Transaction> Transaction for LoggedTransaction<'_, T> {
    async fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.logger.log("batch", sql, params);
        self.inner.execute(sql, params).await
    }

    async fn commit(self) -> OrmResult<()> {
        self.inner.commit().await
    }

    async fn rollback(self) -> OrmResult<()> {
        self.inner.rollback().await
    }
}

impl<E: BlockingExecutor> BlockingExecutor for LoggedExecutor<E> {
    type Tx<'a>
        = LoggedTransaction<'a, E::Tx<'a>>
    where
        Self: 'a;

    fn query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>> {
        self.logger.log("query", sql, params);
        self.inner.query(sql, params)
    }

    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.logger.log("command", sql, params);
        self.inner.execute(sql, params)
    }

    fn begin(&self) -> OrmResult<Self::Tx<'_>> {
        let inner = self.inner.begin()?;
        Ok(LoggedTransaction {
            inner,
            logger: &self.logger,
        })
    }
}

impl<T: BlockingTransaction> BlockingTransaction for LoggedTransaction<'_, T> {
    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.logger.log("batch", sql, params);
        self.inner.execute(sql, params)
    }

    fn commit(self) -> OrmResult<()> {
        self.inner.commit()
    }

    fn rollback(self) -> OrmResult<()> {
        self.inner.rollback()
    }
}
