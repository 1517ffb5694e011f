//! Clause model shared by the query and command builders.

use crate::value::Value;

/// Operators and connectives that may appear in a WHERE chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhereOp {
    Where,
    And,
    Or,
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Lower,
    LowerOrEqual,
    Between,
    In,
}

impl WhereOp {
    pub fn symbol(self) -> &'static str {
        match self {
            WhereOp::Where => "WHERE",
            WhereOp::And => "AND",
            WhereOp::Or => "OR",
            WhereOp::Equals => "=",
            WhereOp::NotEquals => "<>",
            WhereOp::Greater => ">",
            WhereOp::GreaterOrEqual => ">=",
            WhereOp::Lower => "<",
            WhereOp::LowerOrEqual => "<=",
            WhereOp::Between => "BETWEEN",
            WhereOp::In => "IN",
        }
    }

    /// Bare connectives never bind a value.
    pub fn is_connective(self) -> bool {
        matches!(self, WhereOp::Where | WhereOp::And | WhereOp::Or)
    }
}

/// Keywords of the FROM / JOIN fragment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinOp {
    From,
    On,
    Equals,
    Join,
    InnerJoin,
    LeftJoin,
    RightJoin,
}

impl JoinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            JoinOp::From => "FROM",
            JoinOp::On => "ON",
            JoinOp::Equals => "=",
            JoinOp::Join => "JOIN",
            JoinOp::InnerJoin => "INNER JOIN",
            JoinOp::LeftJoin => "LEFT JOIN",
            JoinOp::RightJoin => "RIGHT JOIN",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn symbol(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Parameter name(s) a clause binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    None,
    Single(String),
    /// One name per list element, rendered as `(@a,@b,...)`.
    List(Vec<String>),
}

/// One element of a WHERE chain.
///
/// A clause carrying both `table` and `column` renders as
/// `table.column OP @param`; any other clause renders as `OP @param`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub op: WhereOp,
    pub table: Option<String>,
    pub column: Option<String>,
    pub binding: Binding,
}

impl WhereClause {
    /// A bare connective (`AND`, `OR`).
    pub fn connective(op: WhereOp) -> Self {
        Self {
            op,
            table: None,
            column: None,
            binding: Binding::None,
        }
    }

    /// A comparison against `table.column`.
    pub fn predicate(op: WhereOp, table: &str, column: &str, binding: Binding) -> Self {
        Self {
            op,
            table: Some(table.to_string()),
            column: Some(column.to_string()),
            binding,
        }
    }

    /// An operator followed only by a parameter, e.g. the `AND @hi` half of
    /// `BETWEEN`.
    pub fn trailing(op: WhereOp, parameter: String) -> Self {
        Self {
            op,
            table: None,
            column: None,
            binding: Binding::Single(parameter),
        }
    }
}

/// One rendered FROM/JOIN fragment: `OP text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinFragment {
    pub op: JoinOp,
    pub text: String,
}

/// One ORDER BY entry; `column` is already quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByEntry {
    pub order: Order,
    pub column: String,
}

/// A predicate supplied to an UPDATE command.
///
/// Conditions are rendered in list order against the command's table. Use
/// [`Condition::and`] / [`Condition::or`] between predicates.
///
/// ```ignore
/// use simplify::builder::Condition;
///
/// let wheres = vec![
///     Condition::eq("Id", 7),
///     Condition::and(),
///     Condition::gt("Version", 2),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub(crate) op: WhereOp,
    pub(crate) column: Option<String>,
    pub(crate) value: Option<Value>,
}

impl Condition {
    fn compare(op: WhereOp, column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op,
            column: Some(column.into()),
            value: Some(value.into()),
        }
    }

    pub fn and() -> Self {
        Self {
            op: WhereOp::And,
            column: None,
            value: None,
        }
    }

    pub fn or() -> Self {
        Self {
            op: WhereOp::Or,
            column: None,
            value: None,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::Equals, column, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::NotEquals, column, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::Greater, column, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::GreaterOrEqual, column, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::Lower, column, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(WhereOp::LowerOrEqual, column, value)
    }
}
