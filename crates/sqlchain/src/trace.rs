//! Structured logging of built statements.
//!
//! Enable via the crate feature: `sqlchain = { features = ["tracing"] }`.
//! Events are emitted on target `sqlchain.sql`; without the feature the hooks
//! are no-ops.

use crate::config::RenderConfig;
use crate::error::QbError;
use crate::qb::{BuiltQuery, StatementKind};

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// SQL as it appears in log events, truncated per `max_logged_sql`.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn loggable_sql(sql: &str, config: &RenderConfig) -> String {
    match config.max_logged_sql {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn statement_rendered(kind: StatementKind, config: &RenderConfig, built: &BuiltQuery) {
    tracing::debug!(
        target: "sqlchain.sql",
        kind = kind.as_str(),
        mode = ?config.mode,
        params = built.params.len(),
        sql = %loggable_sql(&built.sql, config),
        "statement rendered"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement_rendered(_kind: StatementKind, _config: &RenderConfig, _built: &BuiltQuery) {}

#[cfg(feature = "tracing")]
pub(crate) fn render_failed(kind: StatementKind, error: &QbError) {
    tracing::warn!(
        target: "sqlchain.sql",
        kind = kind.as_str(),
        error = %error,
        "statement render failed"
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn render_failed(_kind: StatementKind, _error: &QbError) {}
