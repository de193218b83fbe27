//! # sqlchain
//!
//! A composable SQL statement builder.
//!
//! ## Features
//!
//! - **Chained builders**: SELECT / INSERT / UPDATE / DELETE assembled through method calls
//! - **Fixed clause order**: clauses render in canonical order regardless of call order
//! - **Two render modes**: literals inlined for debugging, or placeholders plus an ordered parameter list
//! - **Nested sub-statements**: subqueries in IN, FROM, JOIN, INSERT and raw splices, parameters kept aligned
//! - **Lazy validation**: builders never fail while chaining; errors surface from `build()`
//! - **Optional logging**: `tracing` events for every built statement (feature `tracing`)
//!
//! ## Usage
//!
//! ```ignore
//! use sqlchain::prelude::*;
//!
//! // SELECT id FROM users WHERE (active = 1)
//! let sql = select(["id"]).from("users").and_where("active", "=", 1).to_sql()?;
//!
//! // SELECT id FROM users WHERE (a = $1) OR (b = $2)
//! let built = select(["id"])
//!     .from("users")
//!     .and_where("a", "=", 1)
//!     .or_where("b", "=", 2)
//!     .numbered()
//!     .build()?;
//!
//! // INSERT INTO users (id,name) VALUES (1,'a'),(2,'b')
//! let sql = insert()
//!     .into("users")
//!     .fields(["id", "name"])
//!     .values([row![1, "a"], row![2, "b"]])
//!     .to_sql()?;
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod qb;
mod trace;

pub use config::{PlaceholderStyle, RenderConfig, RenderMode};
pub use error::{QbError, QbResult};

// Re-export qb module for easy access
pub use qb::{
    BuiltQuery, DeleteQb, Expression, InsertQb, Join, JoinKind, JoinOn, JoinQb, Op, Predicate,
    Reference, SelectQb, Source, SqlQb, SubQuery, ToExpression, UpdateQb, Value, WhereQb, alias,
    delete, delete_from, insert, insert_into, select, select_from, update,
};
