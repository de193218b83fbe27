//! The expression node every rendered clause is made of.
//!
//! An [`Expression`] pairs a SQL fragment with the ordered parameters bound to
//! the `?` markers inside it. Composition only ever appends: a parent splices
//! a child's fragment into its own text and appends the child's parameters at
//! the same moment, so parameter `n` always lines up with marker `n`.
//!
//! Bound markers are tracked by position. A `?` that reaches the fragment as
//! raw text (a JSONB operator, a quoted literal) is never numbered or inlined.

use crate::config::RenderMode;
use crate::error::{QbError, QbResult};
use crate::qb::param::{PLACEHOLDER, ParamList, marker_offsets};
use crate::qb::value::{Value, literal};
use std::fmt;
use std::sync::Arc;

/// A rendered SQL fragment plus its positional parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    fragment: String,
    params: ParamList,
    // Byte offset of the marker bound to each parameter.
    marks: Vec<usize>,
}

impl Expression {
    /// Create an expression from a fragment, kept verbatim.
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            params: ParamList::new(),
            marks: Vec::new(),
        }
    }

    /// Create an expression whose `?` markers bind to `params` in order.
    ///
    /// Markers inside quotes are skipped. Markers left over once every
    /// parameter is bound stay literal text.
    ///
    /// # Example
    /// ```ignore
    /// Expression::with_params("a = ? OR b = ?", [1, 2])
    /// ```
    pub fn with_params<V: Into<Value>>(
        fragment: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Self {
        let mut expr = Self::new(fragment);
        expr.append_params(params);
        expr
    }

    /// Create an expression from another node.
    ///
    /// The node's fragment is copied as-is; its parameters come first, followed
    /// by `params`.
    pub fn from_node<V: Into<Value>>(node: &Expression, params: impl IntoIterator<Item = V>) -> Self {
        let mut expr = node.clone();
        expr.append_params(params);
        expr
    }

    /// Append parameters after the existing ones.
    ///
    /// Each one binds to the next unbound `?` after the last bound marker.
    pub fn append_params<V: Into<Value>>(&mut self, params: impl IntoIterator<Item = V>) -> &mut Self {
        let values: Vec<Value> = params.into_iter().map(Into::into).collect();
        let after = self.marks.last().map(|&mark| mark + PLACEHOLDER.len());
        let free = marker_offsets(&self.fragment)
            .into_iter()
            .filter(|&pos| after.is_none_or(|start| pos >= start))
            .take(values.len());
        self.marks.extend(free);
        self.params.extend_values(values);
        self
    }

    /// Append a single placeholder and bind its value.
    pub fn push_bind(&mut self, value: Value) -> &mut Self {
        self.marks.push(self.fragment.len());
        self.fragment.push_str(PLACEHOLDER);
        self.params.push(value);
        self
    }

    /// Append raw SQL text (no parameters).
    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        self.fragment.push_str(sql);
        self
    }

    /// Append another expression: its fragment and then its parameters.
    pub fn push_expr(&mut self, other: &Expression) -> &mut Self {
        let base = self.fragment.len();
        self.marks.extend(other.marks.iter().map(|mark| mark + base));
        self.fragment.push_str(&other.fragment);
        self.params.extend(&other.params);
        self
    }

    /// Wrap the fragment in parentheses.
    pub fn wrap_parens(mut self) -> Self {
        self.fragment.insert(0, '(');
        self.fragment.push(')');
        self.shift_marks(1);
        self
    }

    /// Prefix the fragment with `keyword` and a space.
    pub(crate) fn prefixed(mut self, keyword: &str) -> Self {
        self.fragment.insert(0, ' ');
        self.fragment.insert_str(0, keyword);
        self.shift_marks(keyword.len() + 1);
        self
    }

    fn shift_marks(&mut self, by: usize) {
        for mark in &mut self.marks {
            *mark += by;
        }
    }

    /// Join expressions with `sep`, flattening parameters in the same order.
    pub fn join<'a>(exprs: impl IntoIterator<Item = &'a Expression>, sep: &str) -> Expression {
        let mut out = Expression::default();
        for (i, expr) in exprs.into_iter().enumerate() {
            if i > 0 {
                out.fragment.push_str(sep);
            }
            out.push_expr(expr);
        }
        out
    }

    /// Check whether the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// The SQL fragment.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The parameters, in binding order.
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Project the current state as `(fragment, params)`.
    ///
    /// Calling this repeatedly always yields the same result.
    pub fn render(&self) -> (String, Vec<Value>) {
        (self.fragment.clone(), self.params.as_slice().to_vec())
    }

    /// Byte offsets of the bound markers, one per parameter.
    pub(crate) fn marks(&self) -> &[usize] {
        &self.marks
    }

    /// Fail unless every parameter is bound to exactly one marker.
    pub fn check_aligned(&self) -> QbResult<()> {
        if self.marks.len() != self.params.len() {
            return Err(QbError::invalid_value(format!(
                "{} placeholders but {} parameters in {:?}",
                self.marks.len(),
                self.params.len(),
                self.fragment
            )));
        }
        Ok(())
    }

    /// Write every bound parameter into the fragment as a SQL literal.
    ///
    /// The result carries no parameters.
    pub fn inlined(&self) -> QbResult<Expression> {
        self.check_aligned()?;
        if self.params.is_empty() {
            return Ok(self.clone());
        }
        let mut out = String::with_capacity(self.fragment.len());
        let mut last = 0;
        for (&mark, param) in self.marks.iter().zip(self.params.iter()) {
            out.push_str(&self.fragment[last..mark]);
            out.push_str(&literal(param)?);
            last = mark + PLACEHOLDER.len();
        }
        out.push_str(&self.fragment[last..]);
        Ok(Expression::new(out))
    }

    /// Split into fragment and parameters.
    pub fn into_parts(self) -> (String, ParamList) {
        (self.fragment, self.params)
    }
}

impl From<&str> for Expression {
    fn from(fragment: &str) -> Self {
        Expression::new(fragment)
    }
}

impl From<String> for Expression {
    fn from(fragment: String) -> Self {
        Expression::new(fragment)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragment)
    }
}

/// Anything that renders to an [`Expression`]: statements, template
/// expressions, and user types that want to act as sub-statements.
pub trait ToExpression: fmt::Debug + Send + Sync {
    /// Render in the given mode.
    fn to_expression(&self, mode: RenderMode) -> QbResult<Expression>;
}

impl ToExpression for Expression {
    fn to_expression(&self, mode: RenderMode) -> QbResult<Expression> {
        match mode {
            RenderMode::Inline => self.inlined(),
            RenderMode::Parameterized => Ok(self.clone()),
        }
    }
}

/// A shared handle to a sub-statement.
///
/// The embedding statement references the inner one and reads its rendered
/// fragment and a copy of its parameters each time it renders.
#[derive(Clone)]
pub struct SubQuery(Arc<dyn ToExpression>);

impl SubQuery {
    /// Wrap a renderable node.
    pub fn new(node: impl ToExpression + 'static) -> Self {
        SubQuery(Arc::new(node))
    }

    /// Render the referenced node.
    pub fn render(&self, mode: RenderMode) -> QbResult<Expression> {
        self.0.to_expression(mode)
    }
}

impl fmt::Debug for SubQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SubQuery").field(&self.0).finish()
    }
}

impl PartialEq for SubQuery {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ToExpression + 'static> From<T> for SubQuery {
    fn from(node: T) -> Self {
        SubQuery::new(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_verbatim() {
        let expr = Expression::new("COUNT(*)");
        assert_eq!(expr.render(), ("COUNT(*)".to_string(), vec![]));
    }

    #[test]
    fn test_from_node_appends() {
        let inner = Expression::with_params("a = ?", [1]);
        let outer = Expression::from_node(&inner, [2]);
        assert_eq!(outer.fragment(), "a = ?");
        assert_eq!(outer.params().as_slice(), &[Value::Int(1), Value::Int(2)]);
        // The source node is untouched.
        assert_eq!(inner.params().len(), 1);
    }

    #[test]
    fn test_join_keeps_order() {
        let a = Expression::with_params("a = ?", [1]);
        let b = Expression::new("b IS NULL");
        let c = Expression::with_params("c IN (?, ?)", [2, 3]);
        let joined = Expression::join([&a, &b, &c], " AND ");
        assert_eq!(joined.fragment(), "a = ? AND b IS NULL AND c IN (?, ?)");
        assert_eq!(
            joined.params().as_slice(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[test]
    fn test_render_is_pure() {
        let expr = Expression::with_params("x = ?", ["y"]);
        assert_eq!(expr.render(), expr.render());
    }

    #[test]
    fn test_wrap_and_prefix() {
        let expr = Expression::new("a = 1").wrap_parens().prefixed("OR");
        assert_eq!(expr.fragment(), "OR (a = 1)");
    }

    #[test]
    fn test_marks_follow_composition() {
        let mut inner = Expression::new("a = ");
        inner.push_bind(Value::Int(1));
        let mut outer = Expression::new("x ? 'k' AND ");
        outer.push_expr(&inner.wrap_parens().prefixed("OR"));
        assert_eq!(outer.fragment(), "x ? 'k' AND OR (a = ?)");
        assert_eq!(outer.marks(), &[20]);
    }

    #[test]
    fn test_inlined_writes_literals() {
        let expr = Expression::with_params("lower(email) = lower(?) AND note <> 'why?'", ["A@B.C"]);
        let inlined = expr.inlined().unwrap();
        assert_eq!(
            inlined.fragment(),
            "lower(email) = lower('A@B.C') AND note <> 'why?'"
        );
        assert!(inlined.params().is_empty());
        assert_eq!(expr.to_expression(RenderMode::Inline).unwrap(), inlined);
        assert_eq!(expr.to_expression(RenderMode::Parameterized).unwrap(), expr);
    }

    #[test]
    fn test_unbound_params_are_rejected() {
        let expr = Expression::with_params("id = ?", [1, 2]);
        assert!(expr.check_aligned().unwrap_err().is_invalid_value());
        assert!(expr.inlined().is_err());
    }

    #[test]
    fn test_from_node_binds_next_marker() {
        let node = Expression::with_params("a = ? OR b = ?", [1]);
        let expr = Expression::from_node(&node, [2]);
        assert_eq!(expr.inlined().unwrap().fragment(), "a = 1 OR b = 2");
    }

    #[test]
    fn test_subquery_eq_is_identity() {
        let a = SubQuery::new(Expression::new("SELECT 1"));
        let b = a.clone();
        let c = SubQuery::new(Expression::new("SELECT 1"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
