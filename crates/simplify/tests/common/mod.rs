//! In-memory recording executors shared by the integration tests.
//!
//! `MockExecutor` implements the async [`Executor`]; wrap it in [`Blocking`]
//! for the [`BlockingExecutor`] path. Both record every call, return the same
//! canned rows for every query, and can be told to fail the Nth statement.

#![allow(dead_code)]

pub mod capture;

use std::sync::Mutex;

use simplify::{
    BlockingExecutor, BlockingTransaction, Executor, OrmError, OrmResult, Parameters, Row,
    Transaction,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Query { sql: String, params: Parameters },
    Execute { sql: String, params: Parameters },
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Default)]
pub struct MockExecutor {
    rows: Vec<Row>,
    affected: u64,
    /// 1-based index of the statement that fails.
    fail_on: Option<usize>,
    fail_rollback: bool,
    statements: Mutex<usize>,
    events: Mutex<Vec<Event>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            affected: 1,
            ..Self::default()
        }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn fail_on(mut self, statement: usize) -> Self {
        self.fail_on = Some(statement);
        self
    }

    pub fn fail_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// SQL of every query, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Query { sql, .. } => Some(sql),
                _ => None,
            })
            .collect()
    }

    /// SQL of every executed statement, in call order.
    pub fn statements(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Execute { sql, .. } => Some(sql),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    fn do_query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>> {
        self.record(Event::Query {
            sql: sql.to_string(),
            params: params.clone(),
        });
        Ok(self.rows.clone())
    }

    fn do_execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        let n = {
            let mut count = self.statements.lock().unwrap();
            *count += 1;
            *count
        };
        self.record(Event::Execute {
            sql: sql.to_string(),
            params: params.clone(),
        });
        if self.fail_on == Some(n) {
            return Err(OrmError::executor(format!("statement {n} failed")));
        }
        Ok(self.affected)
    }

    fn do_begin(&self) {
        self.record(Event::Begin);
    }

    fn do_commit(&self) -> OrmResult<()> {
        self.record(Event::Commit);
        Ok(())
    }

    fn do_rollback(&self) -> OrmResult<()> {
        self.record(Event::Rollback);
        if self.fail_rollback {
            return Err(OrmError::executor("connection lost"));
        }
        Ok(())
    }
}

pub struct MockTx<'a>(&'a MockExecutor);

impl Transaction for MockTx<'_> {
    async fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.0.do_execute(sql, params)
    }

    async fn commit(self) -> OrmResult<()> {
        self.0.do_commit()
    }

    async fn rollback(self) -> OrmResult<()> {
        self.0.do_rollback()
    }
}

impl Executor for MockExecutor {
    type Tx<'a>
        = MockTx<'a>
    where
        Self: 'a;

    async fn query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>> {
        self.do_query(sql, params)
    }

    async fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.do_execute(sql, params)
    }

    async fn begin(&self) -> OrmResult<Self::Tx<'_>> {
        self.do_begin();
        Ok(MockTx(self))
    }
}

/// Blocking view of a [`MockExecutor`].
pub struct Blocking<'a>(pub &'a MockExecutor);

pub struct BlockingMockTx<'a>(&'a MockExecutor);

impl BlockingTransaction for BlockingMockTx<'_> {
    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.0.do_execute(sql, params)
    }

    fn commit(self) -> OrmResult<()> {
        self.0.do_commit()
    }

    fn rollback(self) -> OrmResult<()> {
        self.0.do_rollback()
    }
}

impl BlockingExecutor for Blocking<'_> {
    type Tx<'a>
        = BlockingMockTx<'a>
    where
        Self: 'a;

    fn query(&self, sql: &str, params: &Parameters) -> OrmResult<Vec<Row>> {
        self.0.do_query(sql, params)
    }

    fn execute(&self, sql: &str, params: &Parameters) -> OrmResult<u64> {
        self.0.do_execute(sql, params)
    }

    fn begin(&self) -> OrmResult<Self::Tx<'_>> {
        self.0.do_begin();
        Ok(BlockingMockTx(self.0))
    }
}
