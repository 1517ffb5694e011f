//! INSERT / UPDATE command builder.

use crate::builder::clause::{Binding, Condition, WhereClause};
use crate::builder::param::Parameters;
use crate::builder::{finish, render_where};
use crate::dialect::{Dialect, Formatter};
use crate::error::OrmResult;
use crate::metadata::{Entity, MetadataProvider};
use crate::value::Value;

#[derive(Debug, Clone, Default)]
struct InsertState {
    columns: Vec<String>,
    /// Placeholder names per row, aligned with `columns`.
    rows: Vec<Vec<String>>,
    params: Parameters,
}

#[derive(Debug, Clone, Default)]
struct UpdateState {
    columns: Vec<String>,
    wheres: Vec<WhereClause>,
    params: Parameters,
}

/// Accumulates one INSERT or UPDATE and renders it.
///
/// If both insert and update values have been supplied the INSERT is
/// rendered and the update state is ignored. Each path keeps its own
/// parameter table, and [`CommandBuilder::parameters`] returns the one that
/// matches the rendered statement.
///
/// ```ignore
/// use simplify::{CommandBuilder, Dialect};
///
/// let cmd = CommandBuilder::new(Dialect::Postgres)
///     .insert_values("User", [("Username", "ann"), ("Password", "pw")]);
///
/// assert_eq!(
///     cmd.build_command(),
///     r#"INSERT INTO "User" ("Username", "Password") VALUES (@Username, @Password);"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    dialect: Dialect,
    table: String,
    insert: InsertState,
    update: UpdateState,
}

impl CommandBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: String::new(),
            insert: InsertState::default(),
            update: UpdateState::default(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn fmt(&self) -> &'static dyn Formatter {
        self.dialect.formatter()
    }

    // ==================== INSERT ====================

    /// Insert one row of `(column, value)` pairs into `table`.
    pub fn insert_values<I, C, V>(self, table: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        let (columns, row): (Vec<String>, Vec<Value>) = values
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        self.set_insert(table, columns, vec![row])
    }

    /// Insert one row built from an entity's mapped properties.
    pub fn add_insert<T, M>(self, metadata: &M, entity: &T) -> OrmResult<Self>
    where
        T: Entity,
        M: MetadataProvider,
    {
        self.add_insert_many(metadata, std::slice::from_ref(entity))
    }

    /// Multi-row insert. Row `i > 0` suffixes each placeholder with `i`:
    /// `VALUES (@a, @b), (@a1, @b1)`. A suffixed name already taken by an
    /// earlier placeholder (column `a1` next to `a`) is minted fresh instead.
    pub fn add_insert_many<T, M>(self, metadata: &M, entities: &[T]) -> OrmResult<Self>
    where
        T: Entity,
        M: MetadataProvider,
    {
        let table = metadata.table_name::<T>()?;
        let mut columns = Vec::new();
        let mut rows = Vec::with_capacity(entities.len());
        for (i, entity) in entities.iter().enumerate() {
            let props = metadata.properties(entity)?;
            if i == 0 {
                columns = props.iter().map(|p| p.column.clone()).collect();
            }
            rows.push(props.into_iter().map(|p| p.value).collect());
        }
        Ok(self.set_insert(&table, columns, rows))
    }

    fn set_insert(mut self, table: &str, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        self.table = table.to_string();
        let mut params = Parameters::new();
        let names: Vec<Vec<String>> = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| bind_row_param(&mut params, row_param(column, i), value))
                    .collect::<Vec<String>>()
            })
            .collect();
        self.insert = InsertState {
            columns,
            rows: names,
            params,
        };
        self
    }

    // ==================== UPDATE ====================

    /// `UPDATE table SET ... WHERE <conditions>`; conditions render against
    /// `table` in list order.
    pub fn update_values<I, C, V>(mut self, table: &str, values: I, wheres: Vec<Condition>) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        self.table = table.to_string();
        let mut params = Parameters::new();
        let mut columns = Vec::new();
        for (column, value) in values {
            let column = column.into();
            params.insert(column.clone(), value.into());
            columns.push(column);
        }

        let wheres = wheres
            .into_iter()
            .map(|cond| match (cond.column, cond.value) {
                (Some(column), Some(value)) => {
                    let name = params.bind(&column, value);
                    WhereClause::predicate(cond.op, table, &column, Binding::Single(name))
                }
                _ => WhereClause::connective(cond.op),
            })
            .collect();

        self.update = UpdateState {
            columns,
            wheres,
            params,
        };
        self
    }

    /// Single-predicate update: `... WHERE table.column = @column0`.
    pub fn update_where_equals<I, C, V>(
        self,
        table: &str,
        values: I,
        column: &str,
        value: impl Into<Value>,
    ) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Value>,
    {
        self.update_values(table, values, vec![Condition::eq(column, value)])
    }

    /// Update built from an entity's mapped properties.
    pub fn add_update<T, M>(self, metadata: &M, entity: &T, wheres: Vec<Condition>) -> OrmResult<Self>
    where
        T: Entity,
        M: MetadataProvider,
    {
        let table = metadata.table_name::<T>()?;
        let values = metadata
            .properties(entity)?
            .into_iter()
            .map(|p| (p.column, p.value));
        Ok(self.update_values(&table, values, wheres))
    }

    pub fn add_update_where_equals<T, M>(
        self,
        metadata: &M,
        entity: &T,
        column: &str,
        value: impl Into<Value>,
    ) -> OrmResult<Self>
    where
        T: Entity,
        M: MetadataProvider,
    {
        self.add_update(metadata, entity, vec![Condition::eq(column, value)])
    }

    // ==================== Output ====================

    fn is_insert(&self) -> bool {
        !self.table.is_empty() && !self.insert.columns.is_empty() && !self.insert.rows.is_empty()
    }

    fn is_update(&self) -> bool {
        !self.table.is_empty() && !self.update.columns.is_empty()
    }

    /// Render the command; an unconfigured builder renders `""`.
    pub fn build_command(&self) -> String {
        let fmt = self.fmt();

        if self.is_insert() {
            let columns: Vec<String> = self.insert.columns.iter().map(|c| fmt.column(c)).collect();
            let rows: Vec<String> = self
                .insert
                .rows
                .iter()
                .map(|row| {
                    let placeholders: Vec<String> =
                        row.iter().map(|name| fmt.parameter(name)).collect();
                    format!("({})", placeholders.join(", "))
                })
                .collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                fmt.table(&self.table),
                columns.join(", "),
                rows.join(", ")
            );
            return finish(sql);
        }

        if self.is_update() {
            let sets: Vec<String> = self
                .update
                .columns
                .iter()
                .map(|c| format!("{} = {}", fmt.column(c), fmt.parameter(c)))
                .collect();
            let mut sql = format!("UPDATE {} SET {} ", fmt.table(&self.table), sets.join(", "));
            if !self.update.wheres.is_empty() {
                sql.push_str("WHERE ");
                for clause in &self.update.wheres {
                    render_where(&mut sql, fmt, clause);
                }
            }
            return finish(sql);
        }

        String::new()
    }

    /// Parameters of the statement [`Self::build_command`] renders.
    pub fn parameters(&self) -> &Parameters {
        if self.is_insert() {
            &self.insert.params
        } else {
            &self.update.params
        }
    }

    pub fn build(self) -> (String, Parameters) {
        let sql = self.build_command();
        let params = if self.is_insert() {
            self.insert.params
        } else {
            self.update.params
        };
        (sql, params)
    }
}

fn row_param(column: &str, row: usize) -> String {
    if row == 0 {
        column.to_string()
    } else {
        format!("{column}{row}")
    }
}

/// Bind under `preferred`, or under a minted `preferred_N` when that name is taken.
fn bind_row_param(params: &mut Parameters, preferred: String, value: Value) -> String {
    if params.contains(&preferred) {
        params.bind(&format!("{preferred}_"), value)
    } else {
        params.insert(preferred.clone(), value);
        preferred
    }
}
