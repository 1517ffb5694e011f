//! SELECT query builder.

use crate::builder::clause::{
    Binding, JoinFragment, JoinOp, Order, OrderByEntry, WhereClause, WhereOp,
};
use crate::builder::param::Parameters;
use crate::builder::{finish, render_where};
use crate::dialect::{Dialect, Formatter};
use crate::value::Value;

/// Accumulates SELECT / FROM / JOIN / WHERE / ORDER BY / TOP / LIMIT state and
/// renders it as parameterized SQL.
///
/// WHERE predicates form a flat chain in call order. `and_*` / `or_*` push a
/// bare connective before the predicate; nothing is ever parenthesized.
///
/// # Example
///
/// ```ignore
/// use simplify::{Dialect, QueryBuilder};
///
/// let q = QueryBuilder::new(Dialect::SqlServer)
///     .select_fields("User", ["UserId", "Username"])
///     .top(10)
///     .from("User")
///     .where_equals("User", "Active", true)
///     .and_greater("User", "Age", 18);
///
/// assert_eq!(
///     q.build_query(),
///     "SELECT TOP 10 [User].[UserId], [User].[Username] FROM [User] \
///      WHERE [User].[Active] = @Active0 AND [User].[Age] > @Age0 ;"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    selects: Vec<String>,
    joins: Vec<JoinFragment>,
    wheres: Vec<WhereClause>,
    orders: Vec<OrderByEntry>,
    top: Option<u64>,
    limit: Option<u64>,
    params: Parameters,
}

macro_rules! comparisons {
    ($(
        $op:ident, $sym:literal => $where_fn:ident, $where_if:ident, $and_fn:ident, $and_if:ident, $or_fn:ident, $or_if:ident;
    )*) => {
        $(
            #[doc = concat!("`WHERE table.column ", $sym, " @param`")]
            pub fn $where_fn(self, table: &str, column: &str, value: impl Into<Value>) -> Self {
                self.compare(None, WhereOp::$op, table, column, value.into())
            }

            #[doc = concat!("[`Self::", stringify!($where_fn), "`] when `conditional` is true, otherwise a no-op.")]
            pub fn $where_if(self, table: &str, column: &str, value: impl Into<Value>, conditional: bool) -> Self {
                if !conditional {
                    return self;
                }
                self.$where_fn(table, column, value)
            }

            #[doc = concat!("`AND table.column ", $sym, " @param`")]
            pub fn $and_fn(self, table: &str, column: &str, value: impl Into<Value>) -> Self {
                self.compare(Some(WhereOp::And), WhereOp::$op, table, column, value.into())
            }

            #[doc = concat!("[`Self::", stringify!($and_fn), "`] when `conditional` is true, otherwise a no-op.")]
            pub fn $and_if(self, table: &str, column: &str, value: impl Into<Value>, conditional: bool) -> Self {
                if !conditional {
                    return self;
                }
                self.$and_fn(table, column, value)
            }

            #[doc = concat!("`OR table.column ", $sym, " @param`")]
            pub fn $or_fn(self, table: &str, column: &str, value: impl Into<Value>) -> Self {
                self.compare(Some(WhereOp::Or), WhereOp::$op, table, column, value.into())
            }

            #[doc = concat!("[`Self::", stringify!($or_fn), "`] when `conditional` is true, otherwise a no-op.")]
            pub fn $or_if(self, table: &str, column: &str, value: impl Into<Value>, conditional: bool) -> Self {
                if !conditional {
                    return self;
                }
                self.$or_fn(table, column, value)
            }
        )*
    };
}

impl QueryBuilder {
    /// Create an empty builder bound to `dialect`.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            selects: Vec::new(),
            joins: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            top: None,
            limit: None,
            params: Parameters::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn fmt(&self) -> &'static dyn Formatter {
        self.dialect.formatter()
    }

    // ==================== SELECT ====================

    /// Append `table.column` for every column.
    pub fn select_fields<I, S>(mut self, table: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fmt = self.fmt();
        self.selects.extend(
            columns
                .into_iter()
                .map(|c| fmt.table_column(table, c.as_ref())),
        );
        self
    }

    /// Append `table.*`.
    pub fn select_all(mut self, table: &str) -> Self {
        let rendered = format!("{}.*", self.fmt().table(table));
        self.selects.push(rendered);
        self
    }

    /// `SELECT table.* FROM table`.
    pub fn select_all_from(self, table: &str) -> Self {
        self.select_all(table).from(table)
    }

    /// Render `TOP n` after `SELECT`. No-op on dialects that use `LIMIT`.
    pub fn top(mut self, n: u64) -> Self {
        if self.fmt().supports_top() {
            self.top = Some(n);
        }
        self
    }

    /// Render a trailing `LIMIT n`. No-op on dialects that use `TOP`.
    pub fn limit(mut self, n: u64) -> Self {
        if self.fmt().supports_limit() {
            self.limit = Some(n);
        }
        self
    }

    // ==================== FROM / JOIN ====================

    pub fn from(mut self, table: &str) -> Self {
        let text = self.fmt().table(table);
        self.joins.push(JoinFragment {
            op: JoinOp::From,
            text,
        });
        self
    }

    /// `FROM table alias`. The alias is written unquoted.
    pub fn from_as(mut self, table: &str, alias: &str) -> Self {
        if alias.is_empty() {
            return self.from(table);
        }
        let text = format!("{} {alias}", self.fmt().table(table));
        self.joins.push(JoinFragment {
            op: JoinOp::From,
            text,
        });
        self
    }

    fn join_base(
        mut self,
        op: JoinOp,
        right_table: &str,
        right_column: &str,
        left_table: &str,
        left_column: &str,
    ) -> Self {
        let fmt = self.fmt();
        self.joins.push(JoinFragment {
            op,
            text: fmt.table(right_table),
        });
        self.joins.push(JoinFragment {
            op: JoinOp::On,
            text: fmt.table_column(right_table, right_column),
        });
        self.joins.push(JoinFragment {
            op: JoinOp::Equals,
            text: fmt.table_column(left_table, left_column),
        });
        self
    }

    /// `JOIN right ON right.rc = left.lc`
    pub fn join(self, right_table: &str, right_column: &str, left_table: &str, left_column: &str) -> Self {
        self.join_base(JoinOp::Join, right_table, right_column, left_table, left_column)
    }

    /// `INNER JOIN right ON right.rc = left.lc`
    pub fn inner_join(self, right_table: &str, right_column: &str, left_table: &str, left_column: &str) -> Self {
        self.join_base(JoinOp::InnerJoin, right_table, right_column, left_table, left_column)
    }

    /// `LEFT JOIN right ON right.rc = left.lc`
    pub fn left_join(self, right_table: &str, right_column: &str, left_table: &str, left_column: &str) -> Self {
        self.join_base(JoinOp::LeftJoin, right_table, right_column, left_table, left_column)
    }

    /// `RIGHT JOIN right ON right.rc = left.lc`
    pub fn right_join(self, right_table: &str, right_column: &str, left_table: &str, left_column: &str) -> Self {
        self.join_base(JoinOp::RightJoin, right_table, right_column, left_table, left_column)
    }

    // ==================== WHERE ====================

    fn compare(
        mut self,
        connective: Option<WhereOp>,
        op: WhereOp,
        table: &str,
        column: &str,
        value: Value,
    ) -> Self {
        if let Some(c) = connective {
            self.wheres.push(WhereClause::connective(c));
        }
        let name = self.params.bind(column, value);
        self.wheres
            .push(WhereClause::predicate(op, table, column, Binding::Single(name)));
        self
    }

    fn between(
        mut self,
        connective: Option<WhereOp>,
        table: &str,
        column: &str,
        from: Value,
        to: Value,
    ) -> Self {
        self = self.compare(connective, WhereOp::Between, table, column, from);
        let upper = self.params.bind(column, to);
        self.wheres.push(WhereClause::trailing(WhereOp::And, upper));
        self
    }

    fn in_list(
        mut self,
        connective: Option<WhereOp>,
        table: &str,
        column: &str,
        values: Vec<Value>,
    ) -> Self {
        if let Some(c) = connective {
            self.wheres.push(WhereClause::connective(c));
        }
        let base = self.params.mint(column);
        let names = values
            .into_iter()
            .map(|v| self.params.bind(&base, v))
            .collect();
        self.wheres
            .push(WhereClause::predicate(WhereOp::In, table, column, Binding::List(names)));
        self
    }

    comparisons! {
        Equals, "=" => where_equals, where_equals_if, and_equals, and_equals_if, or_equals, or_equals_if;
        NotEquals, "<>" => where_not_equals, where_not_equals_if, and_not_equals, and_not_equals_if, or_not_equals, or_not_equals_if;
        Greater, ">" => where_greater, where_greater_if, and_greater, and_greater_if, or_greater, or_greater_if;
        GreaterOrEqual, ">=" => where_greater_or_equal, where_greater_or_equal_if, and_greater_or_equal, and_greater_or_equal_if, or_greater_or_equal, or_greater_or_equal_if;
        Lower, "<" => where_lower, where_lower_if, and_lower, and_lower_if, or_lower, or_lower_if;
        LowerOrEqual, "<=" => where_lower_or_equal, where_lower_or_equal_if, and_lower_or_equal, and_lower_or_equal_if, or_lower_or_equal, or_lower_or_equal_if;
    }

    /// `WHERE table.column BETWEEN @lo AND @hi`
    pub fn where_between(self, table: &str, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.between(None, table, column, from.into(), to.into())
    }

    pub fn where_between_if(
        self,
        table: &str,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
        conditional: bool,
    ) -> Self {
        if !conditional {
            return self;
        }
        self.where_between(table, column, from, to)
    }

    pub fn and_between(self, table: &str, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.between(Some(WhereOp::And), table, column, from.into(), to.into())
    }

    pub fn and_between_if(
        self,
        table: &str,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
        conditional: bool,
    ) -> Self {
        if !conditional {
            return self;
        }
        self.and_between(table, column, from, to)
    }

    pub fn or_between(self, table: &str, column: &str, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        self.between(Some(WhereOp::Or), table, column, from.into(), to.into())
    }

    pub fn or_between_if(
        self,
        table: &str,
        column: &str,
        from: impl Into<Value>,
        to: impl Into<Value>,
        conditional: bool,
    ) -> Self {
        if !conditional {
            return self;
        }
        self.or_between(table, column, from, to)
    }

    /// `WHERE table.column IN (@c00,@c01,...)`; an empty list renders `IN ()`.
    pub fn where_in<I, V>(self, table: &str, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.in_list(None, table, column, values)
    }

    pub fn where_in_if<I, V>(self, table: &str, column: &str, values: I, conditional: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if !conditional {
            return self;
        }
        self.where_in(table, column, values)
    }

    pub fn and_in<I, V>(self, table: &str, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.in_list(Some(WhereOp::And), table, column, values)
    }

    pub fn and_in_if<I, V>(self, table: &str, column: &str, values: I, conditional: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if !conditional {
            return self;
        }
        self.and_in(table, column, values)
    }

    pub fn or_in<I, V>(self, table: &str, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.in_list(Some(WhereOp::Or), table, column, values)
    }

    pub fn or_in_if<I, V>(self, table: &str, column: &str, values: I, conditional: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if !conditional {
            return self;
        }
        self.or_in(table, column, values)
    }

    // ==================== ORDER BY ====================

    pub fn order_by(mut self, table: &str, column: &str, order: Order) -> Self {
        let column = self.fmt().table_column(table, column);
        self.orders.push(OrderByEntry { order, column });
        self
    }

    // ==================== Output ====================

    /// Render the accumulated state. Rendering never fails; an empty builder
    /// renders `";"`.
    pub fn build_query(&self) -> String {
        let fmt = self.fmt();
        let mut sql = String::new();

        if !self.selects.is_empty() {
            sql.push_str("SELECT ");
            if let Some(top) = self.top {
                sql.push_str(&format!("TOP {top} "));
            }
            sql.push_str(&self.selects.join(", "));
            sql.push(' ');
        }

        for join in &self.joins {
            sql.push_str(&format!("{} {} ", join.op.symbol(), join.text));
        }

        if !self.wheres.is_empty() {
            sql.push_str("WHERE ");
            for clause in &self.wheres {
                render_where(&mut sql, fmt, clause);
            }
        }

        if !self.orders.is_empty() {
            sql.push_str("ORDER BY ");
            let entries: Vec<String> = self
                .orders
                .iter()
                .map(|o| format!("{} {} ", o.column, o.order.symbol()))
                .collect();
            sql.push_str(&entries.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!("LIMIT {limit} "));
        }

        finish(sql)
    }

    /// Every bound parameter, one per rendered `@name` placeholder.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Render and hand back the parameters in one step.
    pub fn build(self) -> (String, Parameters) {
        let sql = self.build_query();
        (sql, self.params)
    }

    /// Reset every accumulated list and the parameter table.
    pub fn clear(&mut self) {
        self.selects.clear();
        self.joins.clear();
        self.wheres.clear();
        self.orders.clear();
        self.top = None;
        self.limit = None;
        self.params.clear();
    }

    pub fn has_wheres(&self) -> bool {
        !self.wheres.is_empty()
    }
}
