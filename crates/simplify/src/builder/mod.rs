//! Query and command builders.
//!
//! Builders accumulate clause state through consuming fluent calls and render
//! it as dialect-quoted SQL with `@name` placeholders. Each builder is bound to
//! one [`Dialect`] and owns its parameter table.
//!
//! # Usage
//!
//! ```ignore
//! use simplify::builder::{self, Order};
//! use simplify::Dialect;
//!
//! // SELECT
//! let q = builder::query(Dialect::Postgres)
//!     .select_all_from("User")
//!     .where_equals("User", "Active", true)
//!     .or_in("User", "Role", ["admin", "owner"])
//!     .order_by("User", "Username", Order::Asc)
//!     .limit(20);
//! let sql = q.build_query();
//! let params = q.parameters();
//!
//! // UPDATE
//! let cmd = builder::command(Dialect::SqlServer)
//!     .update_where_equals("User", [("Username", "ann")], "UserId", 7);
//! ```
//!
//! Rendering follows the same rules for both builders: each clause is written
//! followed by a space, a `;` is appended, doubled spaces are collapsed once
//! and trailing whitespace is trimmed.

mod clause;
mod command;
mod param;
mod query;

pub use clause::{Binding, Condition, JoinFragment, JoinOp, Order, OrderByEntry, WhereClause, WhereOp};
pub use command::CommandBuilder;
pub use param::Parameters;
pub use query::QueryBuilder;

use crate::dialect::{Dialect, Formatter};

/// Create a SELECT builder for `dialect`.
pub fn query(dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(dialect)
}

/// Create an INSERT/UPDATE builder for `dialect`.
pub fn command(dialect: Dialect) -> CommandBuilder {
    CommandBuilder::new(dialect)
}

pub(crate) fn render_where(sql: &mut String, fmt: &dyn Formatter, clause: &WhereClause) {
    let op = clause.op.symbol();
    let param = match &clause.binding {
        Binding::None => String::new(),
        Binding::Single(name) => fmt.parameter(name),
        Binding::List(names) => {
            let list: Vec<String> = names.iter().map(|n| fmt.parameter(n)).collect();
            format!("({})", list.join(","))
        }
    };

    match (&clause.table, &clause.column) {
        (Some(table), Some(column)) if !table.is_empty() && !column.is_empty() => {
            sql.push_str(&format!("{} {op} {param} ", fmt.table_column(table, column)));
        }
        _ => sql.push_str(&format!("{op} {param} ")),
    }
}

pub(crate) fn finish(mut sql: String) -> String {
    sql.push(';');
    let collapsed = sql.replace("  ", " ");
    collapsed.trim_end().to_string()
}
