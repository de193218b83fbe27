//! SELECT statement builder.

use crate::config::{RenderConfig, RenderMode};
use crate::error::{QbError, QbResult};
use crate::qb::expr::{Expression, SubQuery};
use crate::qb::join::{Join, render_joins};
use crate::qb::op::Op;
use crate::qb::predicate::{Predicate, PredicateList};
use crate::qb::reference::{IntoReferences, IntoTokens, Reference, render_list, render_tables};
use crate::qb::traits::{JoinQb, SqlQb, StatementKind, WhereQb, impl_sub_statement, push_clause};
use crate::qb::value::Value;

/// SELECT statement builder.
///
/// Clauses may be added in any order; they always render as
/// `[EXPLAIN] SELECT [DISTINCT] <columns> FROM <tables> <joins> [WHERE ..]
/// [GROUP BY ..] [HAVING ..] [ORDER BY ..] [LIMIT n] [OFFSET m]`.
///
/// The offset always renders as its own `OFFSET m` keyword, never as the
/// MySQL-style `LIMIT m, n` or a bare `LIMIT n m`, and only when it is set.
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    /// SELECT columns (`*` when empty)
    columns: Vec<Reference>,
    /// FROM tables
    tables: Vec<Reference>,
    /// JOIN clauses
    joins: Vec<Join>,
    /// WHERE predicates
    wheres: PredicateList,
    /// GROUP BY tokens
    groups: Vec<String>,
    /// HAVING predicates
    havings: PredicateList,
    /// ORDER BY tokens
    orders: Vec<String>,
    /// LIMIT
    limit: Option<i64>,
    /// OFFSET
    offset: Option<i64>,
    distinct: bool,
    explain: bool,
    config: RenderConfig,
}

impl SelectQb {
    /// Create an empty SELECT builder.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Columns & tables ====================

    /// Append SELECT columns.
    pub fn select(mut self, columns: impl IntoReferences) -> Self {
        self.columns.extend(columns.into_references());
        self
    }

    /// Append one SELECT column.
    pub fn column(mut self, column: impl Into<Reference>) -> Self {
        self.columns.push(column.into());
        self
    }

    /// Append FROM tables.
    pub fn from(mut self, tables: impl IntoReferences) -> Self {
        self.tables.extend(tables.into_references());
        self
    }

    /// Alias for `from`.
    pub fn table(self, tables: impl IntoReferences) -> Self {
        self.from(tables)
    }

    // ==================== Modifiers ====================

    /// Emit `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Prefix the statement with `EXPLAIN`.
    pub fn explain(mut self) -> Self {
        self.explain = true;
        self
    }

    // ==================== Grouping & ordering ====================

    /// Append GROUP BY tokens.
    pub fn group_by(mut self, tokens: impl IntoTokens) -> Self {
        self.groups.extend(tokens.into_tokens());
        self
    }

    /// Alias for `group_by`.
    pub fn group(self, tokens: impl IntoTokens) -> Self {
        self.group_by(tokens)
    }

    /// Append ORDER BY tokens, e.g. `"created_at DESC"`.
    pub fn order_by(mut self, tokens: impl IntoTokens) -> Self {
        self.orders.extend(tokens.into_tokens());
        self
    }

    /// Alias for `order_by`.
    pub fn order(self, tokens: impl IntoTokens) -> Self {
        self.order_by(tokens)
    }

    /// Add `AND column <op> value` to HAVING.
    pub fn having(mut self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.havings.push(Predicate::new(column, op, value));
        self
    }

    /// Add `OR column <op> value` to HAVING.
    pub fn or_having(mut self, column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.havings.push(Predicate::new(column, op, value).or());
        self
    }

    /// Add a sub-statement or template expression to HAVING.
    pub fn having_expr(mut self, node: impl Into<SubQuery>) -> Self {
        self.havings.push(Predicate::expr(node));
        self
    }

    /// Add a prepared predicate to HAVING.
    pub fn having_filter(mut self, predicate: Predicate) -> Self {
        self.havings.push(predicate);
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        let p = page.max(1);
        let size = per_page.max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }

    fn render_limit(&self, sql: &mut Expression) -> QbResult<()> {
        if let Some(n) = self.limit {
            if n < 0 {
                return Err(QbError::invalid_limit(format!("LIMIT must be non-negative, got {n}")));
            }
            sql.push_str(&format!(" LIMIT {n}"));
        }
        if let Some(m) = self.offset {
            if m < 0 {
                return Err(QbError::invalid_limit(format!("OFFSET must be non-negative, got {m}")));
            }
            sql.push_str(&format!(" OFFSET {m}"));
        }
        Ok(())
    }
}

impl SqlQb for SelectQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    fn render_in(&self, mode: RenderMode) -> QbResult<Expression> {
        if self.tables.is_empty() {
            return Err(QbError::invalid_table_name("SELECT requires at least one table"));
        }

        let mut sql = Expression::default();
        if self.explain {
            sql.push_str("EXPLAIN ");
        }
        sql.push_str("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push_str("*");
        } else {
            sql.push_expr(&render_list(&self.columns, ", ", mode)?);
        }

        push_clause(&mut sql, "FROM", &render_tables(&self.tables, mode)?);

        if !self.joins.is_empty() {
            sql.push_str(" ").push_expr(&render_joins(&self.joins, mode)?);
        }
        if !self.wheres.is_empty() {
            push_clause(&mut sql, "WHERE", &self.wheres.render(mode)?);
        }
        if !self.groups.is_empty() {
            push_clause(&mut sql, "GROUP BY", &Expression::new(self.groups.join(",")));
        }
        if !self.havings.is_empty() {
            push_clause(&mut sql, "HAVING", &self.havings.render(mode)?);
        }
        if !self.orders.is_empty() {
            push_clause(&mut sql, "ORDER BY", &Expression::new(self.orders.join(", ")));
        }
        self.render_limit(&mut sql)?;

        Ok(sql)
    }
}

impl WhereQb for SelectQb {
    fn where_list_mut(&mut self) -> &mut PredicateList {
        &mut self.wheres
    }
}

impl JoinQb for SelectQb {
    fn joins_mut(&mut self) -> &mut Vec<Join> {
        &mut self.joins
    }
}

impl_sub_statement!(SelectQb);
