//! Convenient imports for typical `sqlchain` usage.
//!
//! ```ignore
//! use sqlchain::prelude::*;
//! ```

pub use crate::{QbError, QbResult, RenderConfig, RenderMode, row};

pub use crate::qb::{
    Expression, JoinQb, Op, Predicate, SqlQb, Value, WhereQb, alias, delete, delete_from, insert,
    insert_into, select, select_from, update,
};
