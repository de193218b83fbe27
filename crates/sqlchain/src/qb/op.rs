//! Predicate operators.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Operator of a WHERE/HAVING/ON predicate.
///
/// Parsing from text is case-insensitive and collapses runs of whitespace,
/// so `"not  in"` and `"NOT IN"` are the same operator. Unknown operator text
/// is kept as [`Op::Other`] and rendered like a plain comparison.
///
/// # Example
/// ```ignore
/// use sqlchain::Op;
///
/// assert_eq!(Op::from("is not null"), Op::IsNotNull);
/// assert_eq!(Op::from("@>").to_string(), "@>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Op {
    /// `=`
    #[default]
    Eq,
    /// `!=`
    Ne,
    /// `<>`
    NotEqual,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `IS`
    Is,
    /// `IS NOT`
    IsNot,
    /// Any other operator, emitted as given
    Other(String),
}

impl Op {
    /// SQL text of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::NotEqual => "<>",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
            Op::Is => "IS",
            Op::IsNot => "IS NOT",
            Op::Other(s) => s,
        }
    }

    /// Whether the operator requires an operand.
    pub fn needs_operand(&self) -> bool {
        !matches!(self, Op::IsNull | Op::IsNotNull)
    }

    /// `IN` / `NOT IN`
    pub fn is_list(&self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// `BETWEEN` / `NOT BETWEEN`
    pub fn is_range(&self) -> bool {
        matches!(self, Op::Between | Op::NotBetween)
    }

    /// `LIKE` / `NOT LIKE`
    pub fn is_pattern(&self) -> bool {
        matches!(self, Op::Like | Op::NotLike)
    }

    /// `IS NULL` / `IS NOT NULL`
    pub fn is_null_check(&self) -> bool {
        !self.needs_operand()
    }
}

impl From<&str> for Op {
    fn from(s: &str) -> Self {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Op::Eq,
            "!=" => Op::Ne,
            "<>" => Op::NotEqual,
            ">" => Op::Gt,
            ">=" => Op::Gte,
            "<" => Op::Lt,
            "<=" => Op::Lte,
            "LIKE" => Op::Like,
            "NOT LIKE" => Op::NotLike,
            "IN" => Op::In,
            "NOT IN" => Op::NotIn,
            "BETWEEN" => Op::Between,
            "NOT BETWEEN" => Op::NotBetween,
            "IS NULL" => Op::IsNull,
            "IS NOT NULL" => Op::IsNotNull,
            "IS" => Op::Is,
            "IS NOT" => Op::IsNot,
            _ => Op::Other(normalized),
        }
    }
}

impl From<String> for Op {
    fn from(s: String) -> Self {
        Op::from(s.as_str())
    }
}

impl FromStr for Op {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Op::from(s))
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_and_whitespace() {
        assert_eq!(Op::from("not  in"), Op::NotIn);
        assert_eq!(Op::from(" Is Not Null "), Op::IsNotNull);
        assert_eq!(Op::from("between"), Op::Between);
        assert_eq!("<>".parse::<Op>(), Ok(Op::NotEqual));
    }

    #[test]
    fn test_unknown_kept_verbatim() {
        let op = Op::from("ilike");
        assert_eq!(op, Op::Other("ilike".to_string()));
        assert_eq!(op.to_string(), "ilike");
        assert!(op.needs_operand());
    }

    #[test]
    fn test_classes() {
        assert!(Op::In.is_list());
        assert!(Op::NotBetween.is_range());
        assert!(Op::NotLike.is_pattern());
        assert!(!Op::IsNull.needs_operand());
        assert!(Op::IsNotNull.is_null_check());
        assert!(Op::Is.needs_operand());
    }
}
