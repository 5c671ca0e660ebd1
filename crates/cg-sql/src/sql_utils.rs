//! SQL identifier and literal helpers

use regex::Regex;
use std::sync::OnceLock;

fn plain_ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

/// Quote a SQL identifier, doubling embedded double quotes.
///
/// # Examples
/// ```
/// use cg_sql::sql_utils::quote_ident;
/// assert_eq!(quote_ident("orders"), r#""orders""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Whether an identifier can be emitted without quoting
pub fn is_plain_identifier(ident: &str) -> bool {
    plain_ident_re().is_match(ident)
}

/// Emit an identifier bare when it is plain, quoted otherwise.
///
/// # Examples
/// ```
/// use cg_sql::sql_utils::render_ident;
/// assert_eq!(render_ident("orders"), "orders");
/// assert_eq!(render_ident("order items"), r#""order items""#);
/// ```
pub fn render_ident(ident: &str) -> String {
    if is_plain_identifier(ident) {
        ident.to_string()
    } else {
        quote_ident(ident)
    }
}

/// Escape a value for use inside a single-quoted SQL string literal
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// A single-quoted SQL string literal
pub fn string_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}
