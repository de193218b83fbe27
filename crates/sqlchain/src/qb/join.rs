//! JOIN clauses.

use crate::config::RenderMode;
use crate::error::{QbError, QbResult};
use crate::qb::expr::Expression;
use crate::qb::predicate::{Predicate, PredicateList};
use crate::qb::reference::Reference;
use std::fmt;

/// Join kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
    /// `FULL OUTER JOIN`
    Full,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Outer => "OUTER",
            JoinKind::Full => "FULL OUTER",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ON condition of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOn {
    /// SQL text, emitted verbatim without parentheses
    Raw(String),
    /// One predicate, parenthesized, joiner suppressed
    Predicate(Predicate),
    /// Several predicates rendered with their joiners, parenthesized as a group
    Predicates(PredicateList),
}

impl JoinOn {
    fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        match self {
            JoinOn::Raw(sql) if sql.trim().is_empty() => {
                Err(QbError::invalid_value("JOIN requires an ON condition"))
            }
            JoinOn::Raw(sql) => Ok(Expression::new(sql.as_str())),
            JoinOn::Predicate(p) => Ok(p.render(true, mode)?.wrap_parens()),
            JoinOn::Predicates(list) if list.is_empty() => {
                Err(QbError::invalid_value("JOIN requires an ON condition"))
            }
            JoinOn::Predicates(list) => Ok(list.render(mode)?.wrap_parens()),
        }
    }
}

impl From<&str> for JoinOn {
    fn from(sql: &str) -> Self {
        JoinOn::Raw(sql.to_string())
    }
}

impl From<String> for JoinOn {
    fn from(sql: String) -> Self {
        JoinOn::Raw(sql)
    }
}

impl From<Predicate> for JoinOn {
    fn from(p: Predicate) -> Self {
        JoinOn::Predicate(p)
    }
}

impl From<Vec<Predicate>> for JoinOn {
    fn from(list: Vec<Predicate>) -> Self {
        JoinOn::Predicates(list.into())
    }
}

impl<const N: usize> From<[Predicate; N]> for JoinOn {
    fn from(list: [Predicate; N]) -> Self {
        JoinOn::Predicates(list.into_iter().collect())
    }
}

impl From<PredicateList> for JoinOn {
    fn from(list: PredicateList) -> Self {
        JoinOn::Predicates(list)
    }
}

/// `<KIND> JOIN <table> ON <condition>`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: Reference,
    pub on: JoinOn,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<Reference>, on: impl Into<JoinOn>) -> Self {
        Self {
            kind,
            table: table.into(),
            on: on.into(),
        }
    }

    /// Render the join. Table parameters precede ON parameters.
    pub fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        let mut expr = Expression::new(format!("{} JOIN ", self.kind));
        expr.push_expr(&self.table.render_table(mode)?)
            .push_str(" ON ")
            .push_expr(&self.on.render(mode)?);
        Ok(expr)
    }
}

/// Render joins separated by a space.
pub(crate) fn render_joins(joins: &[Join], mode: RenderMode) -> QbResult<Expression> {
    let parts = joins
        .iter()
        .map(|j| j.render(mode))
        .collect::<QbResult<Vec<_>>>()?;
    Ok(Expression::join(&parts, " "))
}
