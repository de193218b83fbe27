//! Trait definitions for statement builders.

use crate::config::{PlaceholderStyle, RenderConfig, RenderMode};
use crate::error::QbResult;
use crate::qb::expr::{Expression, SubQuery, ToExpression};
use crate::qb::join::{Join, JoinKind, JoinOn};
use crate::qb::op::Op;
use crate::qb::param::number_placeholders;
use crate::qb::predicate::{Predicate, PredicateList};
use crate::qb::reference::Reference;
use crate::qb::value::Value;
use crate::trace;

/// Statement kind, used in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

/// The result of building a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }

    /// Split into `(sql, params)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Base trait for all statement builders.
///
/// Builders never fail while chaining; every check runs here.
pub trait SqlQb: ToExpression {
    /// Statement kind.
    fn kind(&self) -> StatementKind;

    /// Render configuration used by [`build`](SqlQb::build).
    fn config(&self) -> &RenderConfig;

    /// Mutable access to the render configuration.
    fn config_mut(&mut self) -> &mut RenderConfig;

    /// Render the statement in `mode`, with `?` markers.
    fn render_in(&self, mode: RenderMode) -> QbResult<Expression>;

    /// Build the statement using the builder's configuration.
    ///
    /// Every parameter must be bound to a placeholder. In inline mode the
    /// parameters are written into the SQL and the returned list is empty.
    fn build(&self) -> QbResult<BuiltQuery> {
        let config = self.config();
        let result = self
            .render_in(config.mode)
            .and_then(|expr| finish(expr, config));
        match &result {
            Ok(built) => trace::statement_rendered(self.kind(), config, built),
            Err(err) => trace::render_failed(self.kind(), err),
        }
        result
    }

    /// Build and split into `(sql, params)`.
    fn render(&self) -> QbResult<(String, Vec<Value>)> {
        self.build().map(BuiltQuery::into_parts)
    }

    /// SQL with every literal inlined, for debugging and logging.
    fn to_sql(&self) -> QbResult<String> {
        let (sql, _) = self.render_in(RenderMode::Inline)?.inlined()?.into_parts();
        Ok(sql)
    }

    /// Replace the render configuration.
    fn with_config(mut self, config: RenderConfig) -> Self
    where
        Self: Sized,
    {
        *self.config_mut() = config;
        self
    }

    /// Render literals as placeholders plus parameters.
    fn parameterized(mut self) -> Self
    where
        Self: Sized,
    {
        self.config_mut().mode = RenderMode::Parameterized;
        self
    }

    /// Render literals inline.
    fn inline(mut self) -> Self
    where
        Self: Sized,
    {
        self.config_mut().mode = RenderMode::Inline;
        self
    }

    /// Parameterized mode with `$1, $2, ...` placeholders.
    fn numbered(mut self) -> Self
    where
        Self: Sized,
    {
        let config = self.config_mut();
        config.mode = RenderMode::Parameterized;
        config.placeholder = PlaceholderStyle::Numbered;
        self
    }
}

fn finish(expr: Expression, config: &RenderConfig) -> QbResult<BuiltQuery> {
    let expr = match config.mode {
        RenderMode::Inline => expr.inlined()?,
        RenderMode::Parameterized => {
            expr.check_aligned()?;
            expr
        }
    };
    let sql = match config.placeholder {
        PlaceholderStyle::Numbered if !expr.marks().is_empty() => {
            number_placeholders(expr.fragment(), expr.marks())
        }
        _ => expr.fragment().to_string(),
    };
    let (_, params) = expr.into_parts();
    Ok(BuiltQuery::new(sql, params.into_vec()))
}

/// WHERE clause methods shared by SELECT, INSERT, UPDATE and DELETE.
pub trait WhereQb: Sized {
    /// The WHERE predicate list.
    fn where_list_mut(&mut self) -> &mut PredicateList;

    /// Add a predicate as-is.
    fn filter(mut self, predicate: Predicate) -> Self {
        self.where_list_mut().push(predicate);
        self
    }

    /// Add `AND column <op> value`.
    fn and_where(self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.filter(Predicate::new(column, op, value))
    }

    /// Add `OR column <op> value`.
    fn or_where(self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.filter(Predicate::new(column, op, value).or())
    }

    /// Add `AND column <op>` with no operand (`IS NULL`, `IS NOT NULL`).
    fn and_where_op(self, column: impl Into<String>, op: impl Into<Op>) -> Self {
        self.filter(Predicate::unary(column, op))
    }

    /// Add `OR column <op>` with no operand.
    fn or_where_op(self, column: impl Into<String>, op: impl Into<Op>) -> Self {
        self.filter(Predicate::unary(column, op).or())
    }

    /// Add `AND column <op> value` with the value's text emitted verbatim.
    fn and_where_raw(self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.filter(Predicate::new(column, op, value).raw())
    }

    /// Add `OR column <op> value` with the value's text emitted verbatim.
    fn or_where_raw(self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.filter(Predicate::new(column, op, value).raw().or())
    }

    /// Add a sub-statement or template expression, AND-joined.
    ///
    /// # Example
    /// ```ignore
    /// qb.where_expr(Expression::with_params("a = ? OR b = ?", [1, 2]))
    /// ```
    fn where_expr(self, node: impl Into<SubQuery>) -> Self {
        self.filter(Predicate::expr(node))
    }

    /// Add a sub-statement or template expression, OR-joined.
    fn or_where_expr(self, node: impl Into<SubQuery>) -> Self {
        self.filter(Predicate::expr(node).or())
    }

    /// Add free-form SQL whose `{{?}}` is replaced by `sub`, AND-joined.
    fn where_splice(self, template: impl Into<String>, sub: impl Into<SubQuery>) -> Self {
        self.filter(Predicate::splice(template, sub))
    }

    /// Add free-form SQL whose `{{?}}` is replaced by `sub`, OR-joined.
    fn or_where_splice(self, template: impl Into<String>, sub: impl Into<SubQuery>) -> Self {
        self.filter(Predicate::splice(template, sub).or())
    }

    // ==================== Convenience filters ====================

    /// `column = value`
    fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Eq, value)
    }

    /// `column != value`
    fn ne(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Ne, value)
    }

    /// `column > value`
    fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Gt, value)
    }

    /// `column >= value`
    fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Gte, value)
    }

    /// `column < value`
    fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Lt, value)
    }

    /// `column <= value`
    fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and_where(column, Op::Lte, value)
    }

    /// `column LIKE pattern`
    fn like(self, column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.and_where(column, Op::Like, pattern)
    }

    /// `column NOT LIKE pattern`
    fn not_like(self, column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.and_where(column, Op::NotLike, pattern)
    }

    /// `column IN (values...)`; `values` may be a list or a sub-statement.
    fn in_list(self, column: impl Into<String>, values: impl Into<Value>) -> Self {
        self.and_where(column, Op::In, values)
    }

    /// `column NOT IN (values...)`
    fn not_in(self, column: impl Into<String>, values: impl Into<Value>) -> Self {
        self.and_where(column, Op::NotIn, values)
    }

    /// `column BETWEEN low AND high`
    fn between(self, column: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.and_where(column, Op::Between, Value::Array(vec![low.into(), high.into()]))
    }

    /// `column NOT BETWEEN low AND high`
    fn not_between(self, column: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.and_where(column, Op::NotBetween, Value::Array(vec![low.into(), high.into()]))
    }

    /// `column IS NULL`
    fn is_null(self, column: impl Into<String>) -> Self {
        self.and_where_op(column, Op::IsNull)
    }

    /// `column IS NOT NULL`
    fn is_not_null(self, column: impl Into<String>) -> Self {
        self.and_where_op(column, Op::IsNotNull)
    }
}

/// JOIN methods shared by every statement kind.
pub trait JoinQb: Sized {
    /// The JOIN list.
    fn joins_mut(&mut self) -> &mut Vec<Join>;

    /// Add a join of the given kind.
    fn join_with(mut self, kind: JoinKind, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.joins_mut().push(Join::new(kind, table, on));
        self
    }

    /// Add `INNER JOIN`.
    fn join(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Inner, table, on)
    }

    /// Add `INNER JOIN`.
    fn join_inner(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Inner, table, on)
    }

    /// Add `LEFT JOIN`.
    fn join_left(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Left, table, on)
    }

    /// Add `RIGHT JOIN`.
    fn join_right(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Right, table, on)
    }

    /// Add `OUTER JOIN`.
    fn join_outer(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Outer, table, on)
    }

    /// Add `FULL OUTER JOIN`.
    fn join_full(self, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        self.join_with(JoinKind::Full, table, on)
    }
}

/// Conversions that let a builder be used as a sub-statement.
macro_rules! impl_sub_statement {
    ($ty:ty) => {
        impl $crate::qb::expr::ToExpression for $ty {
            fn to_expression(
                &self,
                mode: $crate::config::RenderMode,
            ) -> $crate::error::QbResult<$crate::qb::expr::Expression> {
                $crate::qb::traits::SqlQb::render_in(self, mode)
            }
        }

        impl From<$ty> for $crate::qb::value::Value {
            fn from(qb: $ty) -> Self {
                $crate::qb::value::Value::Query($crate::qb::expr::SubQuery::new(qb))
            }
        }

        impl From<$ty> for $crate::qb::reference::Source {
            fn from(qb: $ty) -> Self {
                $crate::qb::reference::Source::Query($crate::qb::expr::SubQuery::new(qb))
            }
        }
    };
}

pub(crate) use impl_sub_statement;

/// Append ` <keyword> <body>` to a statement.
pub(crate) fn push_clause(sql: &mut Expression, keyword: &str, body: &Expression) {
    sql.push_str(" ").push_str(keyword).push_str(" ").push_expr(body);
}
