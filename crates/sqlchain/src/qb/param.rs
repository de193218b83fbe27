//! Ordered parameter storage and placeholder numbering.

use crate::qb::value::Value;
use std::fmt::Write;

/// The placeholder marker used inside every fragment.
///
/// Fragments are always composed with `?`; numbered styles are applied once,
/// when the top-level statement is built.
pub const PLACEHOLDER: &str = "?";

/// An ordered list of bound values.
///
/// Element `n` binds to the `n`-th placeholder marker of the fragment it
/// travels with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Value>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push(&mut self, value: impl Into<Value>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: &ParamList) {
        self.params.extend(other.params.iter().cloned());
    }

    /// Extend this list with values from an iterator.
    pub fn extend_values(&mut self, values: impl IntoIterator<Item = Value>) {
        self.params.extend(values);
    }

    /// Borrow the parameters in binding order.
    pub fn as_slice(&self) -> &[Value] {
        &self.params
    }

    /// Iterate over the parameters in binding order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.params.iter()
    }

    /// Take the parameters out of the list.
    pub fn into_vec(self) -> Vec<Value> {
        self.params
    }
}

impl From<Vec<Value>> for ParamList {
    fn from(params: Vec<Value>) -> Self {
        Self { params }
    }
}

impl FromIterator<Value> for ParamList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Byte offsets of the `?` markers outside quoted literals and quoted
/// identifiers.
pub(crate) fn marker_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    scan_markers(sql, |pos, _, is_marker| {
        if is_marker {
            offsets.push(pos);
        }
    });
    offsets
}

/// Replace the markers at the given byte offsets with `$1, $2, ...`.
///
/// Every other `?` is left alone, including an operator such as JSONB `?`
/// written into a raw fragment.
pub(crate) fn number_placeholders(sql: &str, marks: &[usize]) -> String {
    let mut out = String::with_capacity(sql.len() + marks.len() * 2);
    let mut rest = marks.iter().peekable();
    let mut idx = 0usize;
    for (pos, ch) in sql.char_indices() {
        if rest.next_if(|&&mark| mark == pos).is_some() {
            idx += 1;
            let _ = write!(&mut out, "${}", idx);
        } else {
            out.push(ch);
        }
    }
    out
}

fn scan_markers(sql: &str, mut visit: impl FnMut(usize, char, bool)) {
    let mut quote: Option<char> = None;
    for (pos, ch) in sql.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                visit(pos, ch, false);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    visit(pos, ch, false);
                }
                '?' => visit(pos, ch, true),
                _ => visit(pos, ch, false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_index() {
        let mut params = ParamList::new();
        assert_eq!(params.push(1i64), 1);
        assert_eq!(params.push("a"), 2);
        assert_eq!(params.len(), 2);
        assert_eq!(params.as_slice()[1], Value::Text("a".into()));
    }

    #[test]
    fn test_number_placeholders() {
        let sql = "a = ? AND b IN (?) AND c = ?";
        assert_eq!(
            number_placeholders(sql, &marker_offsets(sql)),
            "a = $1 AND b IN ($2) AND c = $3"
        );
    }

    #[test]
    fn test_marker_offsets_skip_quoted() {
        assert_eq!(marker_offsets("a = 'why?' AND \"odd?\" = ?"), vec![24]);
        assert_eq!(marker_offsets("(a = ?) OR (b = 'it''s ?')"), vec![5]);
        assert!(marker_offsets("SELECT 1").is_empty());
    }

    #[test]
    fn test_number_only_marked_offsets() {
        // "doc ? 'k' AND id = ?": only the bound marker at 19 is numbered.
        assert_eq!(
            number_placeholders("doc ? 'k' AND id = ?", &[19]),
            "doc ? 'k' AND id = $1"
        );
    }
}
