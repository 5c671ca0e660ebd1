//! cg-sql - SQL layer for contextgraph
//!
//! This crate turns resolved join paths into SQL text and screens SQL for
//! destructive statements before it is handed to an execution layer.

pub mod error;
pub mod generator;
pub mod safety;
pub mod sql_utils;

pub use error::{SqlError, SqlResult};
pub use generator::{QueryGenerator, QueryOptions};
pub use safety::{ensure_read_only, ensure_safe, is_safe_sql, screen_sql, UnsafePattern};
