//! Error types for sqlchain

use thiserror::Error;

/// Result type alias for sqlchain operations
pub type QbResult<T> = Result<T, QbError>;

/// Errors raised while rendering a statement.
///
/// Builders never fail while being chained; every check runs when the
/// statement is rendered, and a failed render returns no SQL at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// No table (or an unusable table reference) at render time
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// Missing operand, malformed operand shape, or an unrenderable value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// LIMIT/OFFSET that is not a non-negative integer
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

impl QbError {
    /// Create an invalid table name error
    pub fn invalid_table_name(message: impl Into<String>) -> Self {
        Self::InvalidTableName(message.into())
    }

    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Create an invalid limit error
    pub fn invalid_limit(message: impl Into<String>) -> Self {
        Self::InvalidLimit(message.into())
    }

    /// Check if this is an invalid table name error
    pub fn is_invalid_table_name(&self) -> bool {
        matches!(self, Self::InvalidTableName(_))
    }

    /// Check if this is an invalid value error
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue(_))
    }

    /// Check if this is an invalid limit error
    pub fn is_invalid_limit(&self) -> bool {
        matches!(self, Self::InvalidLimit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = QbError::invalid_value("BETWEEN expects exactly 2 values, got 3");
        assert_eq!(
            err.to_string(),
            "Invalid value: BETWEEN expects exactly 2 values, got 3"
        );
        assert!(err.is_invalid_value());
        assert!(!err.is_invalid_limit());
    }

    #[test]
    fn test_kind_checks() {
        assert!(QbError::invalid_table_name("no table").is_invalid_table_name());
        assert!(QbError::invalid_limit("-1").is_invalid_limit());
    }
}
