//! Advisory SQL screening
//!
//! The generator only emits read queries, so these checks are a second line
//! of defence over text assembled from document-supplied expressions. Pattern
//! screening is text matching and can be evaded; execution layers must not
//! treat a clean screen as a security guarantee.

use crate::error::{SqlError, SqlResult};
use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::sync::OnceLock;

/// A destructive statement shape found by [`screen_sql`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsafePattern {
    DropTable,
    DropDatabase,
    Truncate,
    DeleteWithoutWhere,
    UpdateWithoutWhere,
}

impl std::fmt::Display for UnsafePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsafePattern::DropTable => write!(f, "DROP TABLE"),
            UnsafePattern::DropDatabase => write!(f, "DROP DATABASE"),
            UnsafePattern::Truncate => write!(f, "TRUNCATE"),
            UnsafePattern::DeleteWithoutWhere => write!(f, "DELETE without WHERE"),
            UnsafePattern::UpdateWithoutWhere => write!(f, "UPDATE without WHERE"),
        }
    }
}

fn drop_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bDROP\s+TABLE\b").expect("valid regex"))
}

fn drop_database_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bDROP\s+DATABASE\b").expect("valid regex"))
}

fn truncate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bTRUNCATE\b").expect("valid regex"))
}

fn delete_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bDELETE\s+FROM\b").expect("valid regex"))
}

fn update_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)\bUPDATE\b.*\bSET\b").expect("valid regex"))
}

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bWHERE\b").expect("valid regex"))
}

/// Unsafe patterns found in `sql`, in detection order without repeats.
///
/// Matching is case-insensitive. `DELETE` and `UPDATE` are judged per
/// `;`-separated statement, so a `WHERE` in one statement does not excuse
/// another.
pub fn screen_sql(sql: &str) -> Vec<UnsafePattern> {
    let mut found = Vec::new();
    let mut note = |pattern: UnsafePattern| {
        if !found.contains(&pattern) {
            found.push(pattern);
        }
    };

    for statement in sql.split(';') {
        if drop_table_re().is_match(statement) {
            note(UnsafePattern::DropTable);
        }
        if drop_database_re().is_match(statement) {
            note(UnsafePattern::DropDatabase);
        }
        if truncate_re().is_match(statement) {
            note(UnsafePattern::Truncate);
        }
        let has_where = where_re().is_match(statement);
        if delete_re().is_match(statement) && !has_where {
            note(UnsafePattern::DeleteWithoutWhere);
        }
        if update_re().is_match(statement) && !has_where {
            note(UnsafePattern::UpdateWithoutWhere);
        }
    }

    if !found.is_empty() {
        log::warn!(
            "SQL screening matched: {}",
            found
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    found
}

/// Whether pattern screening found nothing
pub fn is_safe_sql(sql: &str) -> bool {
    screen_sql(sql).is_empty()
}

/// Screen `sql`, turning any match into [`SqlError::UnsafeSql`]
pub fn ensure_safe(sql: &str) -> SqlResult<()> {
    let patterns = screen_sql(sql);
    if patterns.is_empty() {
        Ok(())
    } else {
        Err(SqlError::UnsafeSql {
            patterns: patterns.iter().map(ToString::to_string).collect(),
        })
    }
}

/// Parse `sql` and require every statement to be a read query
pub fn ensure_read_only(sql: &str) -> SqlResult<()> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let statements = Parser::parse_sql(&GenericDialect {}, sql).map_err(|e| {
        let message = e.to_string();
        let (line, column) = error_location(&message);
        SqlError::ParseError {
            message,
            line,
            column,
        }
    })?;
    if statements.is_empty() {
        return Err(SqlError::EmptySql);
    }

    for statement in &statements {
        if !matches!(statement, Statement::Query(_)) {
            return Err(SqlError::UnsupportedStatement(statement_kind(statement)));
        }
    }
    Ok(())
}

fn statement_kind(statement: &Statement) -> String {
    match statement {
        Statement::Insert(_) => "INSERT".to_string(),
        Statement::Update { .. } => "UPDATE".to_string(),
        Statement::Delete(_) => "DELETE".to_string(),
        Statement::Drop { .. } => "DROP".to_string(),
        Statement::Truncate { .. } => "TRUNCATE".to_string(),
        other => other
            .to_string()
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Pull `Line: N, Column: M` out of a sqlparser error message
fn error_location(message: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = message.find(label)? + label.len();
        let digits: String = message[start..]
            .chars()
            .skip_while(|c| c.is_whitespace())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    };
    match (number_after("Line:"), number_after("Column:")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}

#[cfg(test)]
#[path = "safety_test.rs"]
mod tests;
