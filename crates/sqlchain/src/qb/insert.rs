//! INSERT statement builder.

use crate::config::{RenderConfig, RenderMode};
use crate::error::{QbError, QbResult};
use crate::qb::expr::{Expression, SubQuery};
use crate::qb::join::{Join, render_joins};
use crate::qb::predicate::PredicateList;
use crate::qb::reference::{IntoReferences, IntoTokens, Reference, render_list};
use crate::qb::traits::{JoinQb, SqlQb, StatementKind, WhereQb, impl_sub_statement, push_clause};
use crate::qb::value::{Value, coerce};

/// One row of values.
#[derive(Clone, Debug, PartialEq)]
enum Row {
    /// Values in field order
    Positional(Vec<Value>),
    /// `(column, value)` pairs; missing columns render as NULL
    Keyed(Vec<(String, Value)>),
}

/// Where the inserted rows come from.
#[derive(Clone, Debug)]
enum RowSource {
    Rows(Vec<Row>),
    Query(SubQuery),
    /// Input rejected while chaining, reported at render time
    Invalid(String),
}

impl Default for RowSource {
    fn default() -> Self {
        RowSource::Rows(Vec::new())
    }
}

/// INSERT statement builder.
///
/// Renders `INSERT INTO <table> [(<fields>)] VALUES (..),(..) [<joins>]
/// [WHERE ..] [RETURNING ..]`.
#[derive(Clone, Debug, Default)]
pub struct InsertQb {
    table: Option<Reference>,
    fields: Vec<String>,
    source: RowSource,
    joins: Vec<Join>,
    wheres: PredicateList,
    returning: Vec<Reference>,
    config: RenderConfig,
}

impl InsertQb {
    /// Create an INSERT builder with no table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table.
    pub fn into(mut self, table: impl Into<Reference>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Alias for `into`.
    pub fn table(self, table: impl Into<Reference>) -> Self {
        self.into(table)
    }

    /// Set the column list.
    pub fn fields(mut self, fields: impl IntoTokens) -> Self {
        self.fields = fields.into_tokens();
        self
    }

    fn push_row(&mut self, row: Row) {
        match &mut self.source {
            RowSource::Rows(rows) => rows.push(row),
            source @ RowSource::Query(_) => *source = RowSource::Rows(vec![row]),
            RowSource::Invalid(_) => {}
        }
    }

    /// Append positional rows.
    ///
    /// # Example
    /// ```ignore
    /// insert_into("users").fields(["id", "name"]).values(vec![row![1, "a"], row![2, "b"]])
    /// ```
    pub fn values<R, V>(mut self, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for row in rows {
            self.push_row(Row::Positional(row.into_iter().map(Into::into).collect()));
        }
        self
    }

    /// Alias for `values`.
    pub fn data<R, V>(self, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values(rows)
    }

    /// Append one positional row.
    pub fn row<V: Into<Value>>(mut self, row: impl IntoIterator<Item = V>) -> Self {
        self.push_row(Row::Positional(row.into_iter().map(Into::into).collect()));
        self
    }

    /// Append one row of `(column, value)` pairs.
    ///
    /// Without explicit `fields`, the columns of the first keyed row are used;
    /// columns missing from later rows render as NULL.
    pub fn values_keyed<K, V>(mut self, row: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.push_row(Row::Keyed(
            row.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    /// Append rows from JSON: an array of arrays or an array of objects.
    ///
    /// Object keys come in `serde_json` map order (sorted by key).
    pub fn values_json(mut self, json: serde_json::Value) -> Self {
        let rows = match json {
            serde_json::Value::Array(rows) => rows,
            other => {
                self.source = RowSource::Invalid(format!("expected a JSON array of rows, got {other}"));
                return self;
            }
        };
        for row in rows {
            match row {
                serde_json::Value::Array(items) => {
                    self.push_row(Row::Positional(items.into_iter().map(Value::from).collect()));
                }
                serde_json::Value::Object(map) => {
                    self.push_row(Row::Keyed(
                        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
                    ));
                }
                other => {
                    self.source = RowSource::Invalid(format!("expected a JSON row, got {other}"));
                    return self;
                }
            }
        }
        self
    }

    /// Insert the rows produced by a sub-statement: `VALUES (<sub>)`.
    pub fn values_query(mut self, sub: impl Into<SubQuery>) -> Self {
        if !matches!(self.source, RowSource::Invalid(_)) {
            self.source = RowSource::Query(sub.into());
        }
        self
    }

    /// Append RETURNING entries.
    pub fn returning(mut self, fields: impl IntoReferences) -> Self {
        self.returning.extend(fields.into_references());
        self
    }

    fn effective_fields(&self) -> Vec<String> {
        if !self.fields.is_empty() {
            return self.fields.clone();
        }
        match &self.source {
            RowSource::Rows(rows) => match rows.first() {
                Some(Row::Keyed(pairs)) => pairs.iter().map(|(k, _)| k.clone()).collect(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn render_row(&self, row: &Row, fields: &[String], mode: RenderMode) -> QbResult<Expression> {
        let cells: Vec<Value> = match row {
            Row::Positional(values) => {
                if !fields.is_empty() && values.len() != fields.len() {
                    return Err(QbError::invalid_value(format!(
                        "row has {} values but {} fields",
                        values.len(),
                        fields.len()
                    )));
                }
                values.clone()
            }
            Row::Keyed(_) if fields.is_empty() => {
                return Err(QbError::invalid_value("keyed row without field names"));
            }
            Row::Keyed(pairs) => fields
                .iter()
                .map(|f| {
                    pairs
                        .iter()
                        .find(|(k, _)| k == f)
                        .map_or(Value::Null, |(_, v)| v.clone())
                })
                .collect(),
        };
        if cells.is_empty() {
            return Err(QbError::invalid_value("empty row"));
        }

        let parts = cells
            .iter()
            .map(|v| coerce(v, None, false, mode))
            .collect::<QbResult<Vec<_>>>()?;
        Ok(Expression::join(&parts, ",").wrap_parens())
    }

    fn render_values(&self, fields: &[String], mode: RenderMode) -> QbResult<Expression> {
        match &self.source {
            RowSource::Invalid(msg) => Err(QbError::invalid_value(msg.as_str())),
            RowSource::Query(sub) => Ok(sub.render(mode)?.wrap_parens()),
            RowSource::Rows(rows) if rows.is_empty() => {
                Err(QbError::invalid_value("INSERT requires at least one row"))
            }
            RowSource::Rows(rows) => {
                let parts = rows
                    .iter()
                    .map(|row| self.render_row(row, fields, mode))
                    .collect::<QbResult<Vec<_>>>()?;
                Ok(Expression::join(&parts, ","))
            }
        }
    }
}

impl SqlQb for InsertQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
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
            .ok_or_else(|| QbError::invalid_table_name("INSERT requires a table"))?;

        let mut sql = Expression::new("INSERT INTO ");
        sql.push_expr(&table.render_table(mode)?);

        let fields = self.effective_fields();
        if !fields.is_empty() {
            sql.push_str(&format!(" ({})", fields.join(",")));
        }
        push_clause(&mut sql, "VALUES", &self.render_values(&fields, mode)?);

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

impl WhereQb for InsertQb {
    fn where_list_mut(&mut self) -> &mut PredicateList {
        &mut self.wheres
    }
}

impl JoinQb for InsertQb {
    fn joins_mut(&mut self) -> &mut Vec<Join> {
        &mut self.joins
    }
}

impl_sub_statement!(InsertQb);
