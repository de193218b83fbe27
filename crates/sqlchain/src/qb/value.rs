//! Runtime values and their coercion into SQL literals or placeholders.

use crate::config::RenderMode;
use crate::error::{QbError, QbResult};
use crate::qb::expr::{Expression, SubQuery, ToExpression};
use crate::qb::op::Op;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::ser::{Error as _, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// A value that can appear in a statement.
///
/// In inline mode values are written into the SQL text; in parameterized mode
/// each one becomes a placeholder and is appended to the parameter list.
/// `Raw` and `Query` are always spliced into the text.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean, rendered `true` / `false`
    Bool(bool),
    /// Integer, rendered unquoted
    Int(i64),
    /// Float, rendered unquoted
    Float(f64),
    /// String, single-quoted
    Text(String),
    /// UUID, single-quoted
    Uuid(Uuid),
    /// Exact decimal, rendered unquoted
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    /// Timestamp, rendered as a quoted ISO-8601 string
    Date(DateTime<Utc>),
    /// List of values
    Array(Vec<Value>),
    /// SQL text emitted verbatim
    Raw(String),
    /// A sub-statement, spliced parenthesized together with its parameters
    Query(SubQuery),
}

impl Value {
    /// Wrap SQL text that must be emitted verbatim.
    ///
    /// The caller is responsible for the safety of `sql`.
    pub fn raw(sql: impl Into<String>) -> Self {
        Value::Raw(sql.into())
    }

    /// Wrap a sub-statement.
    pub fn query(node: impl ToExpression + 'static) -> Self {
        Value::Query(SubQuery::new(node))
    }

    /// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
    pub fn parse_date(s: &str) -> QbResult<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Value::Date(dt.with_timezone(&Utc)));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Value::from(d));
        }
        Err(QbError::invalid_value(format!("not a date: {s:?}")))
    }

    /// Check whether this value renders as SQL NULL.
    ///
    /// The string `"null"` (any case) counts as NULL.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }

    /// Check whether this is a sub-statement.
    pub fn is_query(&self) -> bool {
        matches!(self, Value::Query(_))
    }
}

/// Render `value` for the given operator context.
///
/// - `raw`: the value's text form, unmodified.
/// - sub-statement: its fragment, parenthesized, with its parameters.
/// - inline mode: a SQL literal (arrays and IN operands as `(a, b)`).
/// - parameterized mode: one `?` and one parameter; IN operands as `(?)`
///   with the whole list bound to that single placeholder.
pub fn coerce(value: &Value, op: Option<&Op>, raw: bool, mode: RenderMode) -> QbResult<Expression> {
    if raw {
        return raw_text(value, mode);
    }

    let list_context = op.is_some_and(Op::is_list);

    match (value, mode) {
        (Value::Raw(sql), _) => Ok(Expression::new(sql.as_str())),
        (Value::Query(sub), _) => Ok(sub.render(mode)?.wrap_parens()),
        (_, RenderMode::Parameterized) => {
            let mut expr = Expression::default();
            expr.push_bind(bind_value(value)?);
            Ok(if list_context { expr.wrap_parens() } else { expr })
        }
        (Value::Array(items), RenderMode::Inline) => inline_list(items, mode),
        (other, RenderMode::Inline) if list_context => {
            inline_list(std::slice::from_ref(other), mode)
        }
        (other, RenderMode::Inline) => Ok(Expression::new(literal(other)?)),
    }
}

/// Render a scalar value as an inline SQL literal.
pub fn literal(value: &Value) -> QbResult<String> {
    if value.is_null() {
        return Ok("NULL".to_string());
    }
    Ok(match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => finite(*f)?.to_string(),
        Value::Text(s) => quote(s),
        Value::Uuid(u) => quote(&u.to_string()),
        #[cfg(feature = "rust_decimal")]
        Value::Decimal(d) => d.to_string(),
        Value::Date(dt) => quote(&iso_string(dt)),
        Value::Raw(sql) => sql.clone(),
        Value::Array(items) => {
            let parts = items.iter().map(literal).collect::<QbResult<Vec<_>>>()?;
            format!("({})", parts.join(", "))
        }
        Value::Null => "NULL".to_string(),
        Value::Query(_) => {
            return Err(QbError::invalid_value(
                "a sub-statement has no literal form; render it through its statement",
            ));
        }
    })
}

fn inline_list(items: &[Value], mode: RenderMode) -> QbResult<Expression> {
    let parts = items
        .iter()
        .map(|v| coerce(v, None, false, mode))
        .collect::<QbResult<Vec<_>>>()?;
    Ok(Expression::join(&parts, ", ").wrap_parens())
}

/// The text form used when the caller asked for raw rendering.
fn raw_text(value: &Value, mode: RenderMode) -> QbResult<Expression> {
    match value {
        Value::Null => Ok(Expression::new("NULL")),
        Value::Text(s) | Value::Raw(s) => Ok(Expression::new(s.as_str())),
        Value::Uuid(u) => Ok(Expression::new(u.to_string())),
        Value::Date(dt) => Ok(Expression::new(iso_string(dt))),
        Value::Query(sub) => sub.render(mode),
        Value::Array(items) => {
            let parts = items
                .iter()
                .map(|v| raw_text(v, mode))
                .collect::<QbResult<Vec<_>>>()?;
            Ok(Expression::join(&parts, ", "))
        }
        other => Ok(Expression::new(literal(other)?)),
    }
}

/// Normalize a value before it is bound as a parameter.
fn bind_value(value: &Value) -> QbResult<Value> {
    match value {
        v if v.is_null() => Ok(Value::Null),
        Value::Float(f) => Ok(Value::Float(finite(*f)?)),
        Value::Array(items) => Ok(Value::Array(
            items.iter().map(bind_value).collect::<QbResult<Vec<_>>>()?,
        )),
        Value::Query(_) | Value::Raw(_) => Err(QbError::invalid_value(
            "raw SQL and sub-statements cannot be bound as parameters",
        )),
        other => Ok(other.clone()),
    }
}

fn finite(f: f64) -> QbResult<f64> {
    if f.is_finite() {
        Ok(f)
    } else {
        Err(QbError::invalid_value(format!("non-finite number: {f}")))
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// `2024-01-02T03:04:05.000Z`
pub(crate) fn iso_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ==================== Conversions ====================

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Date(v.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Value::Query(SubQuery::new(v))
    }
}

impl From<SubQuery> for Value {
    fn from(v: SubQuery) -> Self {
        Value::Query(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Text(obj.to_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) | Value::Raw(s) => serializer.serialize_str(s),
            Value::Uuid(u) => serializer.collect_str(u),
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(d) => serializer.collect_str(d),
            Value::Date(dt) => serializer.serialize_str(&iso_string(dt)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Query(_) => Err(S::Error::custom("sub-statements are not serializable")),
        }
    }
}

/// Build a `Vec<Value>` from mixed scalars.
///
/// # Example
/// ```ignore
/// let rows = vec![row![1, "alice"], row![2, "bob"]];
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::Value::from($value)),*]
    };
}
