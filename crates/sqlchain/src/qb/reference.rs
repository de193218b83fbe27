//! Column and table references.
//!
//! A reference is a plain name (emitted verbatim) or an aliased source,
//! rendered as `<source> AS <alias>`. A sub-statement source is parenthesized,
//! so `alias("up", select(["*"]).from("permissions"))` renders
//! `(SELECT * FROM permissions) AS up`.

use crate::config::RenderMode;
use crate::error::{QbError, QbResult};
use crate::qb::expr::{Expression, SubQuery, ToExpression};

/// The right-hand side of an alias.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Table or column name, emitted verbatim
    Name(String),
    /// Sub-statement, parenthesized
    Query(SubQuery),
    /// SQL expression with optional parameters
    Expr(Expression),
}

impl Source {
    fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        match self {
            Source::Name(name) => Ok(Expression::new(name.as_str())),
            Source::Query(sub) => Ok(sub.render(mode)?.wrap_parens()),
            Source::Expr(expr) => expr.to_expression(mode),
        }
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Name(name.to_string())
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Name(name)
    }
}

impl From<Expression> for Source {
    fn from(expr: Expression) -> Self {
        Source::Expr(expr)
    }
}

impl From<SubQuery> for Source {
    fn from(sub: SubQuery) -> Self {
        Source::Query(sub)
    }
}

/// A column, table or RETURNING reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// Plain name, emitted verbatim
    Name(String),
    /// `<source> AS <alias>`
    Aliased { alias: String, source: Source },
    /// SQL expression with optional parameters
    Expr(Expression),
}

/// Build an aliased reference: `alias("u", "users")` renders `users AS u`.
pub fn alias(alias: impl Into<String>, source: impl Into<Source>) -> Reference {
    Reference::Aliased {
        alias: alias.into(),
        source: source.into(),
    }
}

impl Reference {
    /// Render the reference.
    pub fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        match self {
            Reference::Name(name) => Ok(Expression::new(name.as_str())),
            Reference::Expr(expr) => expr.to_expression(mode),
            Reference::Aliased { alias, source } => {
                let mut expr = source.render(mode)?;
                expr.push_str(" AS ").push_str(alias);
                Ok(expr)
            }
        }
    }

    /// Render as a table reference, rejecting blank names and aliases.
    pub fn render_table(&self, mode: RenderMode) -> QbResult<Expression> {
        let blank = match self {
            Reference::Name(name) => name.trim().is_empty(),
            Reference::Expr(expr) => expr.fragment().trim().is_empty(),
            Reference::Aliased { alias, source } => {
                alias.trim().is_empty()
                    || matches!(source, Source::Name(name) if name.trim().is_empty())
            }
        };
        if blank {
            return Err(QbError::invalid_table_name(format!("blank table reference {self:?}")));
        }
        self.render(mode)
    }
}

/// Render references separated by `sep`.
pub(crate) fn render_list(refs: &[Reference], sep: &str, mode: RenderMode) -> QbResult<Expression> {
    let parts = refs
        .iter()
        .map(|r| r.render(mode))
        .collect::<QbResult<Vec<_>>>()?;
    Ok(Expression::join(&parts, sep))
}

/// Render table references separated by `, `.
pub(crate) fn render_tables(refs: &[Reference], mode: RenderMode) -> QbResult<Expression> {
    let parts = refs
        .iter()
        .map(|r| r.render_table(mode))
        .collect::<QbResult<Vec<_>>>()?;
    Ok(Expression::join(&parts, ", "))
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Name(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Name(name)
    }
}

impl From<&String> for Reference {
    fn from(name: &String) -> Self {
        Reference::Name(name.clone())
    }
}

impl From<Expression> for Reference {
    fn from(expr: Expression) -> Self {
        Reference::Expr(expr)
    }
}

/// Anything usable as a list of references: one name, an array, a slice or a `Vec`.
pub trait IntoReferences {
    fn into_references(self) -> Vec<Reference>;
}

impl IntoReferences for Reference {
    fn into_references(self) -> Vec<Reference> {
        vec![self]
    }
}

impl IntoReferences for &str {
    fn into_references(self) -> Vec<Reference> {
        vec![self.into()]
    }
}

impl IntoReferences for String {
    fn into_references(self) -> Vec<Reference> {
        vec![self.into()]
    }
}

impl<T: Into<Reference>> IntoReferences for Vec<T> {
    fn into_references(self) -> Vec<Reference> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Reference>, const N: usize> IntoReferences for [T; N] {
    fn into_references(self) -> Vec<Reference> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Reference> + Clone> IntoReferences for &[T] {
    fn into_references(self) -> Vec<Reference> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Anything usable as a list of GROUP BY / ORDER BY / field tokens.
pub trait IntoTokens {
    fn into_tokens(self) -> Vec<String>;
}

impl IntoTokens for &str {
    fn into_tokens(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoTokens for String {
    fn into_tokens(self) -> Vec<String> {
        vec![self]
    }
}

impl<T: Into<String>> IntoTokens for Vec<T> {
    fn into_tokens(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<String>, const N: usize> IntoTokens for [T; N] {
    fn into_tokens(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: AsRef<str>> IntoTokens for &[T] {
    fn into_tokens(self) -> Vec<String> {
        self.iter().map(|t| t.as_ref().to_string()).collect()
    }
}
