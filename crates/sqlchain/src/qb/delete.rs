//! DELETE statement builder.

use crate::config::{RenderConfig, RenderMode};
use crate::error::{QbError, QbResult};
use crate::qb::expr::Expression;
use crate::qb::join::{Join, render_joins};
use crate::qb::predicate::PredicateList;
use crate::qb::reference::{IntoReferences, Reference, render_list};
use crate::qb::traits::{JoinQb, SqlQb, StatementKind, WhereQb, impl_sub_statement, push_clause};

/// DELETE statement builder.
///
/// Renders `DELETE FROM <table> [<joins>] [WHERE ..] [RETURNING ..]`.
/// No WHERE clause is added implicitly: without predicates every row matches.
#[derive(Clone, Debug, Default)]
pub struct DeleteQb {
    table: Option<Reference>,
    joins: Vec<Join>,
    wheres: PredicateList,
    returning: Vec<Reference>,
    config: RenderConfig,
}

impl DeleteQb {
    /// Create a DELETE builder with no table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn from(mut self, table: impl Into<Reference>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Alias for `from`.
    pub fn table(self, table: impl Into<Reference>) -> Self {
        self.from(table)
    }

    /// Append RETURNING entries.
    pub fn returning(mut self, fields: impl IntoReferences) -> Self {
        self.returning.extend(fields.into_references());
        self
    }
}

impl SqlQb for DeleteQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    fn render_in(&self, mode: RenderMode) -> QbResult<Expression> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| QbError::invalid_table_name("DELETE requires a table"))?;

        let mut sql = Expression::new("DELETE FROM ");
        sql.push_expr(&table.render_table(mode)?);

        if !self.joins.is_empty() {
            sql.push_str(" ").push_expr(&render_joins(&self.joins, mode)?);
        }
        if !self.wheres.is_empty() {
            push_clause(&mut sql, "WHERE", &self.wheres.render(mode)?);
        }
        if !self.returning.is_empty() {
            push_clause(&mut sql, "RETURNING", &render_list(&self.returning, ", ", mode)?);
        }
        Ok(sql)
    }
}

impl WhereQb for DeleteQb {
    fn where_list_mut(&mut self) -> &mut PredicateList {
        &mut self.wheres
    }
}

impl JoinQb for DeleteQb {
    fn joins_mut(&mut self) -> &mut Vec<Join> {
        &mut self.joins
    }
}

impl_sub_statement!(DeleteQb);
