//! Error types for cg-sql

use thiserror::Error;

/// SQL screening errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Statement other than a query (S003)
    #[error("[S003] Only read queries are allowed, found: {0}")]
    UnsupportedStatement(String),

    /// Advisory pattern screening matched (S004)
    #[error("[S004] SQL matched unsafe patterns: {}", patterns.join(", "))]
    UnsafeSql { patterns: Vec<String> },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
