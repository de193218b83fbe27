//! UPDATE statement builder.

use crate::config::{RenderConfig, RenderMode};
use crate::error::{QbError, QbResult};
use crate::qb::expr::Expression;
use crate::qb::join::{Join, render_joins};
use crate::qb::predicate::PredicateList;
use crate::qb::reference::{IntoReferences, Reference, render_list};
use crate::qb::traits::{JoinQb, SqlQb, StatementKind, WhereQb, impl_sub_statement, push_clause};
use crate::qb::value::{Value, coerce};

/// Key suffix that marks a raw assignment in [`UpdateQb::set_map`].
pub const RAW_SUFFIX: &str = "__raw";

/// `column = value`
#[derive(Clone, Debug, PartialEq)]
struct Assignment {
    column: String,
    value: Value,
    raw: bool,
}

impl Assignment {
    fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        let mut expr = Expression::new(format!("{} = ", self.column));
        expr.push_expr(&coerce(&self.value, None, self.raw, mode)?);
        Ok(expr)
    }
}

/// UPDATE statement builder.
///
/// Renders `UPDATE <table> SET a = 1, b = 'x' [<joins>] [WHERE ..] [RETURNING ..]`.
#[derive(Clone, Debug, Default)]
pub struct UpdateQb {
    table: Option<Reference>,
    sets: Vec<Assignment>,
    joins: Vec<Join>,
    wheres: PredicateList,
    returning: Vec<Reference>,
    config: RenderConfig,
}

impl UpdateQb {
    /// Create an UPDATE builder for a table.
    pub fn new(table: impl Into<Reference>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    /// Replace the target table.
    pub fn table(mut self, table: impl Into<Reference>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Alias for `table`.
    pub fn from(self, table: impl Into<Reference>) -> Self {
        self.table(table)
    }

    /// Add `column = value`.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push(Assignment {
            column: column.into(),
            value: value.into(),
            raw: false,
        });
        self
    }

    /// Add `column = <sql>` with the value's text emitted verbatim.
    ///
    /// # Example
    /// ```ignore
    /// update("users").set_raw("updated_at", "NOW()")
    /// ```
    pub fn set_raw(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sets.push(Assignment {
            column: column.into(),
            value: value.into(),
            raw: true,
        });
        self
    }

    /// Add several assignments. A key ending in `__raw` is a raw assignment to
    /// the column without the suffix.
    pub fn set_map<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            let key = key.into();
            self = match key.strip_suffix(RAW_SUFFIX) {
                Some(column) => {
                    let column = column.to_string();
                    self.set_raw(column, value)
                }
                None => self.set(key, value),
            };
        }
        self
    }

    /// Append RETURNING entries.
    pub fn returning(mut self, fields: impl IntoReferences) -> Self {
        self.returning.extend(fields.into_references());
        self
    }
}

impl SqlQb for UpdateQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
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
            .ok_or_else(|| QbError::invalid_table_name("UPDATE requires a table"))?;
        if self.sets.is_empty() {
            return Err(QbError::invalid_value("UPDATE requires at least one assignment"));
        }

        let mut sql = Expression::new("UPDATE ");
        sql.push_expr(&table.render_table(mode)?);

        let sets = self
            .sets
            .iter()
            .map(|s| s.render(mode))
            .collect::<QbResult<Vec<_>>>()?;
        push_clause(&mut sql, "SET", &Expression::join(&sets, ", "));

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

impl WhereQb for UpdateQb {
    fn where_list_mut(&mut self) -> &mut PredicateList {
        &mut self.wheres
    }
}

impl JoinQb for UpdateQb {
    fn joins_mut(&mut self) -> &mut Vec<Join> {
        &mut self.joins
    }
}

impl_sub_statement!(UpdateQb);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::reference::alias;

    #[test]
    fn test_update_basic() {
        let qb = UpdateQb::new("users")
            .set("status", "inactive")
            .set("score", 3)
            .eq("id", 1);
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE users SET status = 'inactive', score = 3 WHERE (id = 1)"
        );
    }

    #[test]
    fn test_update_with_join() {
        let qb = UpdateQb::new("users")
            .set("users.removed_at", Value::parse_date("2022-01-08").unwrap())
            .join(alias("ur", "user_roles"), "ur.user_id = users.user_id")
            .gte("users.user_id", 20)
            .eq("ur.role_id", 15);
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE users SET users.removed_at = '2022-01-08T00:00:00.000Z' \
             INNER JOIN user_roles AS ur ON ur.user_id = users.user_id \
             WHERE (users.user_id >= 20) AND (ur.role_id = 15)"
        );
    }

    #[test]
    fn test_set_map_raw_suffix() {
        let qb = UpdateQb::new("users").set_map([
            ("name", Value::from("bob")),
            ("updated_at__raw", Value::from("NOW()")),
        ]);
        assert_eq!(
            qb.to_sql().unwrap(),
            "UPDATE users SET name = 'bob', updated_at = NOW()"
        );
    }

    #[test]
    fn test_parameterized_set_before_where() {
        let (sql, params) = UpdateQb::new("users")
            .set("name", "bob")
            .set_raw("version", "version + 1")
            .eq("id", 7)
            .returning(["id"])
            .parameterized()
            .render()
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET name = ?, version = version + 1 WHERE (id = ?) RETURNING id"
        );
        assert_eq!(params, vec![Value::from("bob"), Value::Int(7)]);
    }

    #[test]
    fn test_errors() {
        let err = UpdateQb::new("users").to_sql().unwrap_err();
        assert!(err.is_invalid_value());
        let err = UpdateQb::new("").set("a", 1).to_sql().unwrap_err();
        assert!(err.is_invalid_table_name());
    }
}
