//! Executor traits: the boundary where rendered SQL meets a database.
//!
//! The core never talks to a driver. Applications implement [`Executor`]
//! (async) or [`BlockingExecutor`] for their connection type and get row
//! mapping, single-command and batch execution for free.
//!
//! Errors returned by an implementation are passed back to the caller
//! unchanged. Nothing is retried.

use std::future::Future;

use crate::builder::{CommandBuilder, Parameters, QueryBuilder};
use crate::error::{OrmError, OrmResult};
use crate::row::{FromRow, Row};

/// A transaction handed out by [`Executor::begin`].
pub trait Transaction: Send + Sync {
    /// Execute one statement inside the transaction.
    fn execute(
        &self,
        sql: &str,
        params: &Parameters,
    ) -> impl Future<Output = OrmResult<u64>> + Send;

    fn commit(self) -> impl Future<Output = OrmResult<()>> + Send;

    fn rollback(self) -> impl Future<Output = OrmResult<()>> + Send;
}

/// An async connection capable of running rendered statements.
pub trait Executor: Send + Sync {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    /// Run a query and return every row.
    fn query(
        &self,
        sql: &str,
        params: &Parameters,
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &Parameters,
    ) -> impl Future<Output = OrmResult<u64>> + Send;

    fn begin(&self) -> impl Future<Output = OrmResult<Self::Tx<'_>>> + Send;

    /// Render `query`, run it and map every row.
    fn fetch_all<T: FromRow + Send>(
        &self,
        query: &QueryBuilder,
    ) -> impl Future<Output = OrmResult<Vec<T>>> + Send {
        async move {
            let sql = query.build_query();
            let rows = self.query(&sql, query.parameters()).await?;
            rows.iter().map(T::from_row).collect()
        }
    }

    /// Render `query`, run it and map the first row, if any.
    fn fetch_first_or_default<T: FromRow + Send>(
        &self,
        query: &QueryBuilder,
    ) -> impl Future<Output = OrmResult<Option<T>>> + Send {
        async move {
            let sql = query.build_query();
            let rows = self.query(&sql, query.parameters()).await?;
            rows.first().map(T::from_row).transpose()
        }
    }

    /// Run one command in its own transaction.
    fn run(&self, command: &CommandBuilder) -> impl Future<Output = OrmResult<u64>> + Send {
        async move {
            let sql = command.build_command();
            let tx = self.begin().await?;
            match tx.execute(&sql, command.parameters()).await {
                Ok(affected) => {
                    tx.commit().await?;
                    Ok(affected)
                }
                Err(error) => Err(abort(error, tx.rollback().await)),
            }
        }
    }

    /// Run commands in list order inside one transaction.
    ///
    /// Commits only if every command succeeds. The first failure rolls the
    /// transaction back and is returned; later commands are not run.
    fn run_batch(&self, commands: &[CommandBuilder]) -> impl Future<Output = OrmResult<()>> + Send {
        async move {
            let tx = self.begin().await?;
            for command in commands {
                let sql = command.build_command();
                if let Err(error) = tx.execute(&sql, command.parameters()).await {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        target: "simplify.sql",
                        statements = commands.len(),
                        error = %error,
                        "batch failed; rolling back"
                    );
                    return Err(abort(error, tx.rollback().await));
                }
            }
            tx.commit().await
        }
    }
}

/// A transaction handed out by [`BlockingExecutor::begin`].
pub trait BlockingTransaction {
    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64>;

    fn commit(self) -> OrmResult<()>;

    fn rollback(self) -> OrmResult<()>;
}

/// Synchronous counterpart of [`Executor`].
pub trait BlockingExecutor {
    type Tx<'a>: BlockingTransaction
    where
        Self: 'a;

    fn query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>>;

    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64>;

    fn begin(&self) -> OrmResult<Self::Tx<'_>>;

    fn fetch_all<T: FromRow>(&self, query: &QueryBuilder) -> OrmResult<Vec<T>> {
        let sql = query.build_query();
        let rows = self.query(&sql, query.parameters())?;
        rows.iter().map(T::from_row).collect()
    }

    fn fetch_first_or_default<T: FromRow>(&self, query: &QueryBuilder) -> OrmResult<Option<T>> {
        let sql = query.build_query();
        let rows = self.query(&sql, query.parameters())?;
        rows.first().map(T::from_row).transpose()
    }

    fn run(&self, command: &CommandBuilder) -> OrmResult<u64> {
        let sql = command.build_command();
        let tx = self.begin()?;
        match tx.execute(&sql, command.parameters()) {
            Ok(affected) => {
                tx.commit()?;
                Ok(affected)
            }
            Err(error) => Err(abort(error, tx.rollback())),
        }
    }

    fn run_batch(&self, commands: &[CommandBuilder]) -> OrmResult<()> {
        let tx = self.begin()?;
        for command in commands {
            let sql = command.build_command();
            if let Err(error) = tx.execute(&sql, command.parameters()) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "simplify.sql",
                    statements = commands.len(),
                    error = %error,
                    "batch failed; rolling back"
                );
                return Err(abort(error, tx.rollback()));
            }
        }
        tx.commit()
    }
}

/// The original error survives a clean rollback untouched.
fn abort(error: OrmError, rollback: OrmResult<()>) -> OrmError {
    match rollback {
        Ok(()) => error,
        Err(rollback_err) => OrmError::Other(format!("{error} (rollback failed: {rollback_err})")),
    }
}
