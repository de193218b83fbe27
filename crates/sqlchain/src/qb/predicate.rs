//! WHERE / HAVING / ON predicates.
//!
//! A [`Predicate`] renders itself with its AND/OR joiner, except when it is the
//! first entry of its list. A [`PredicateList`] walks its entries in insertion
//! order and flattens their parameters in the same order.

use crate::config::RenderMode;
use crate::error::{QbError, QbResult};
use crate::qb::expr::{Expression, SubQuery};
use crate::qb::op::Op;
use crate::qb::value::{Value, coerce};

/// Marker replaced by a sub-statement in a splice predicate.
pub const SPLICE_MARKER: &str = "{{?}}";

/// Token placed before every predicate but the first.
///
/// There is no "none" joiner: the first entry of a list never emits its
/// joiner, whichever one it carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    pub fn as_str(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// Left-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    /// Column name or any SQL text, emitted verbatim.
    Column(String),
    /// A sub-statement or template expression, rendered with its own parameters.
    Expr(SubQuery),
    /// Free-form SQL whose first [`SPLICE_MARKER`] is replaced by the
    /// sub-statement's fragment.
    Splice { template: String, sub: SubQuery },
}

/// One predicate entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    joiner: Joiner,
    subject: Subject,
    op: Op,
    operand: Option<Value>,
    raw: bool,
    parens: bool,
}

impl Predicate {
    /// `column <op> value`
    ///
    /// A column containing [`SPLICE_MARKER`] paired with a sub-statement value
    /// becomes a splice predicate.
    pub fn new(column: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        let column = column.into();
        match value.into() {
            Value::Query(sub) if column.contains(SPLICE_MARKER) => Self::splice(column, sub),
            value => Self::build(Subject::Column(column), op.into(), Some(value)),
        }
    }

    /// `column <op>` with no operand, e.g. `IS NULL`.
    ///
    /// Operators that need an operand fail at render time.
    pub fn unary(column: impl Into<String>, op: impl Into<Op>) -> Self {
        Self::build(Subject::Column(column.into()), op.into(), None)
    }

    /// A whole sub-statement or template expression as the predicate.
    pub fn expr(node: impl Into<SubQuery>) -> Self {
        Self::build(Subject::Expr(node.into()), Op::default(), None)
    }

    /// Free-form SQL with a `{{?}}` splice point.
    pub fn splice(template: impl Into<String>, sub: impl Into<SubQuery>) -> Self {
        Self::build(
            Subject::Splice {
                template: template.into(),
                sub: sub.into(),
            },
            Op::default(),
            None,
        )
    }

    fn build(subject: Subject, op: Op, operand: Option<Value>) -> Self {
        Self {
            joiner: Joiner::And,
            subject,
            op,
            operand,
            raw: false,
            parens: true,
        }
    }

    /// Join with AND (the default).
    pub fn and(mut self) -> Self {
        self.joiner = Joiner::And;
        self
    }

    /// Join with OR.
    pub fn or(mut self) -> Self {
        self.joiner = Joiner::Or;
        self
    }

    /// Set the joiner.
    pub fn with_joiner(mut self, joiner: Joiner) -> Self {
        self.joiner = joiner;
        self
    }

    /// Emit the operand's text form verbatim instead of quoting or binding it.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Do not wrap the rendered predicate in parentheses.
    pub fn no_parens(mut self) -> Self {
        self.parens = false;
        self
    }

    pub fn joiner(&self) -> Joiner {
        self.joiner
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Render the predicate. `first` suppresses the joiner.
    pub fn render(&self, first: bool, mode: RenderMode) -> QbResult<Expression> {
        let body = match &self.subject {
            Subject::Expr(sub) => sub.render(mode)?,
            Subject::Splice { template, sub } => render_splice(template, sub, mode)?,
            Subject::Column(column) => self.render_column(column, mode)?,
        };

        let body = if self.wraps() { body.wrap_parens() } else { body };
        Ok(if first {
            body
        } else {
            body.prefixed(self.joiner.as_str())
        })
    }

    fn wraps(&self) -> bool {
        if !self.parens {
            return false;
        }
        match self.subject {
            Subject::Column(_) => {
                !(self.op.is_range()
                    || self.op.is_pattern()
                    || self.op.is_list()
                    || self.op.is_null_check())
            }
            Subject::Expr(_) | Subject::Splice { .. } => true,
        }
    }

    fn render_column(&self, column: &str, mode: RenderMode) -> QbResult<Expression> {
        let op = &self.op;
        if op.is_null_check() {
            return Ok(Expression::new(format!("{column} {op}")));
        }

        let operand = self.operand.as_ref().ok_or_else(|| {
            QbError::invalid_value(format!("{column} {op} requires a value"))
        })?;

        let mut expr = Expression::new(format!("{column} {op} "));
        if op.is_range() {
            let (low, high) = match operand {
                Value::Array(bounds) if bounds.len() == 2 => (&bounds[0], &bounds[1]),
                Value::Array(bounds) => {
                    return Err(QbError::invalid_value(format!(
                        "{op} expects exactly 2 values, got {}",
                        bounds.len()
                    )));
                }
                _ => {
                    return Err(QbError::invalid_value(format!(
                        "{op} expects a pair of values"
                    )));
                }
            };
            expr.push_expr(&coerce(low, None, self.raw, mode)?)
                .push_str(" AND ")
                .push_expr(&coerce(high, None, self.raw, mode)?);
        } else {
            expr.push_expr(&coerce(operand, Some(op), self.raw, mode)?);
        }
        Ok(expr)
    }
}

fn render_splice(template: &str, sub: &SubQuery, mode: RenderMode) -> QbResult<Expression> {
    let pos = template.find(SPLICE_MARKER).ok_or_else(|| {
        QbError::invalid_value(format!("no {SPLICE_MARKER} marker in {template:?}"))
    })?;
    let mut expr = Expression::new(&template[..pos]);
    expr.push_expr(&sub.render(mode)?)
        .push_str(&template[pos + SPLICE_MARKER.len()..]);
    Ok(expr)
}

/// Ordered predicate entries of one clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateList {
    entries: Vec<Predicate>,
}

impl PredicateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.entries.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.entries.iter()
    }

    /// Render all entries separated by a space; the first drops its joiner.
    pub fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        let parts = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, p)| p.render(i == 0, mode))
            .collect::<QbResult<Vec<_>>>()?;
        Ok(Expression::join(&parts, " "))
    }
}

impl From<Vec<Predicate>> for PredicateList {
    fn from(entries: Vec<Predicate>) -> Self {
        Self { entries }
    }
}

impl FromIterator<Predicate> for PredicateList {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
