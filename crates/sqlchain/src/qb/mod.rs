//! Composable statement builders.
//!
//! Every builder renders to an [`Expression`]: a SQL fragment plus the ordered
//! parameters bound to its `?` markers. Clauses render in a fixed order no
//! matter how they were added, and nested sub-statements splice their
//! parameters in at the position their fragment lands, so parameter `n`
//! always binds to placeholder `n`.
//!
//! # Usage
//!
//! ```ignore
//! use sqlchain::prelude::*;
//!
//! // SELECT id FROM users WHERE (active = 1)
//! let sql = select(["id"]).from("users").and_where("active", "=", 1).to_sql()?;
//!
//! // Nested sub-statement in IN, parameterized
//! let roles = select(["id"]).from("roles").eq("name", "admin");
//! let built = select(["id"])
//!     .from("users")
//!     .in_list("role_id", roles)
//!     .numbered()
//!     .build()?;
//! // built.sql == "SELECT id FROM users WHERE role_id IN (SELECT id FROM roles WHERE (name = $1))"
//!
//! // INSERT
//! let sql = insert_into("users")
//!     .fields(["id", "name"])
//!     .values([row![1, "a"], row![2, "b"]])
//!     .to_sql()?;
//!
//! // UPDATE
//! let sql = update("users").set("status", "inactive").eq("id", 7).to_sql()?;
//!
//! // DELETE
//! let sql = delete_from("users").eq("id", 7).to_sql()?;
//! ```

mod delete;
mod expr;
mod insert;
mod join;
mod op;
mod param;
mod predicate;
mod reference;
mod select;
mod traits;
mod update;
mod value;

pub use delete::DeleteQb;
pub use expr::{Expression, SubQuery, ToExpression};
pub use insert::InsertQb;
pub use join::{Join, JoinKind, JoinOn};
pub use op::Op;
pub use param::{PLACEHOLDER, ParamList};
pub use predicate::{Joiner, Predicate, PredicateList, SPLICE_MARKER, Subject};
pub use reference::{IntoReferences, IntoTokens, Reference, Source, alias};
pub use select::SelectQb;
pub use traits::{BuiltQuery, JoinQb, SqlQb, StatementKind, WhereQb};
pub use update::{RAW_SUFFIX, UpdateQb};
pub use value::{Value, coerce, literal};

/// Create a SELECT builder with the given columns.
///
/// # Example
/// ```ignore
/// let qb = sqlchain::qb::select(["id", "name"]).from("users");
/// ```
pub fn select(columns: impl IntoReferences) -> SelectQb {
    SelectQb::new().select(columns)
}

/// Create a `SELECT *` builder for the given table.
pub fn select_from(table: impl IntoReferences) -> SelectQb {
    SelectQb::new().from(table)
}

/// Create an INSERT builder; set the table with `into`.
pub fn insert() -> InsertQb {
    InsertQb::new()
}

/// Create an INSERT builder for the given table.
pub fn insert_into(table: impl Into<Reference>) -> InsertQb {
    InsertQb::new().into(table)
}

/// Create an UPDATE builder for the given table.
pub fn update(table: impl Into<Reference>) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder; set the table with `from`.
///
/// No WHERE clause is added implicitly.
pub fn delete() -> DeleteQb {
    DeleteQb::new()
}

/// Create a DELETE builder for the given table.
pub fn delete_from(table: impl Into<Reference>) -> DeleteQb {
    DeleteQb::new().from(table)
}

#[cfg(test)]
mod tests;
