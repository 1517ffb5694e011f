//! Per-entity repository over an executor.

use std::marker::PhantomData;

use crate::builder::{CommandBuilder, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::executor::Executor;
use crate::metadata::{Entity, MetadataProvider};
use crate::row::FromRow;
use crate::value::Value;

/// Common reads and writes for one entity type.
///
/// # Example
///
/// ```ignore
/// let users = Repository::<User, _, _>::new(&executor, &registry, Dialect::Postgres);
///
/// let ann = users.first_or_default_by_column_equals("Username", "ann").await?;
/// users.update_where_column_equals(&ann_changed, "UserId", 7).await?;
/// ```
pub struct Repository<'a, T, E, M> {
    executor: &'a E,
    metadata: &'a M,
    dialect: Dialect,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T, E, M> Repository<'a, T, E, M>
where
    T: Entity + FromRow + Send,
    E: Executor,
    M: MetadataProvider,
{
    pub fn new(executor: &'a E, metadata: &'a M, dialect: Dialect) -> Self {
        Self {
            executor,
            metadata,
            dialect,
            _entity: PhantomData,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table_name(&self) -> OrmResult<String> {
        self.metadata.table_name::<T>()
    }

    /// Column name mapped to `property`, if any.
    pub fn column_name(&self, property: &str) -> Option<String> {
        self.metadata.column_name::<T>(property)
    }

    /// `SELECT t.* FROM t`, ready for further predicates.
    pub fn select(&self) -> OrmResult<QueryBuilder> {
        let table = self.table_name()?;
        Ok(QueryBuilder::new(self.dialect).select_all_from(&table))
    }

    pub async fn first_or_default_by_column_equals(
        &self,
        column: &str,
        value: impl Into<Value>,
    ) -> OrmResult<Option<T>> {
        let table = self.table_name()?;
        let query = self.select()?.where_equals(&table, column, value);
        self.executor.fetch_first_or_default(&query).await
    }

    pub async fn query_by_column_equals(
        &self,
        column: &str,
        value: impl Into<Value>,
    ) -> OrmResult<Vec<T>> {
        let table = self.table_name()?;
        let query = self.select()?.where_equals(&table, column, value);
        self.executor.fetch_all(&query).await
    }

    pub async fn query_by_column_in<I, V>(&self, column: &str, values: I) -> OrmResult<Vec<T>>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let table = self.table_name()?;
        let query = self.select()?.where_in(&table, column, values);
        self.executor.fetch_all(&query).await
    }

    pub async fn insert(&self, entity: &T) -> OrmResult<u64> {
        let command = CommandBuilder::new(self.dialect).add_insert(self.metadata, entity)?;
        self.executor.run(&command).await
    }

    /// Multi-row insert in one statement. An empty slice runs nothing.
    pub async fn insert_many(&self, entities: &[T]) -> OrmResult<u64> {
        if entities.is_empty() {
            return Ok(0);
        }
        let command = CommandBuilder::new(self.dialect).add_insert_many(self.metadata, entities)?;
        self.executor.run(&command).await
    }

    /// `UPDATE t SET <every mapped column> WHERE t.column = @column0`
    pub async fn update_where_column_equals(
        &self,
        entity: &T,
        column: &str,
        value: impl Into<Value>,
    ) -> OrmResult<u64> {
        let command =
            CommandBuilder::new(self.dialect).add_update_where_equals(self.metadata, entity, column, value)?;
        self.executor.run(&command).await
    }
}
