//! Query synthesis from a context document and a join path
//!
//! Select items naming a metric are expanded to `expression AS id`; all other
//! items pass through untouched, so callers can mix raw columns and metrics.
//! Table names are the datasets' local ids and aliases come from each
//! dataset's `alias`, falling back to the local id.

use crate::sql_utils::{render_ident, string_literal};
use cg_core::{ContextDocument, JoinPath, JoinPathEdge};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("valid regex"))
}

/// Optional clauses of a generated query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Conditions combined with `AND`
    pub where_clauses: Vec<String>,
    pub group_by: Vec<String>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_where(mut self, clause: impl Into<String>) -> Self {
        self.where_clauses.push(clause.into());
        self
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by.push(column.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Generates SQL text against one context document
pub struct QueryGenerator<'a> {
    doc: &'a ContextDocument,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(doc: &'a ContextDocument) -> Self {
        Self { doc }
    }

    /// Build a query joining the datasets on `path`.
    ///
    /// The first edge's left dataset is the root `FROM`. An empty path queries
    /// the first declared dataset on its own.
    pub fn generate_query<S: AsRef<str>>(
        &self,
        select: &[S],
        path: &JoinPath,
        options: &QueryOptions,
    ) -> String {
        let Some(root) = path.root_dataset() else {
            let first = self
                .doc
                .datasets
                .first()
                .map(|d| d.local_id.as_str())
                .unwrap_or("dataset");
            return self.generate_dataset_query(first, select, options);
        };

        let joins = path.iter().map(|edge| self.join_clause(edge)).collect();
        let sql = self.assemble(select, root, joins, options);
        log::debug!("Generated query over {} join(s)", path.len());
        sql
    }

    /// Build a query over one dataset with every optional clause
    pub fn generate_dataset_query<S: AsRef<str>>(
        &self,
        local_id: &str,
        select: &[S],
        options: &QueryOptions,
    ) -> String {
        self.assemble(select, local_id, Vec::new(), options)
    }

    /// Build a query over one dataset
    pub fn generate_single_dataset_query<S: AsRef<str>>(
        &self,
        local_id: &str,
        select: &[S],
        where_clauses: &[String],
        limit: Option<u64>,
    ) -> String {
        let options = QueryOptions {
            where_clauses: where_clauses.to_vec(),
            limit,
            ..QueryOptions::default()
        };
        self.generate_dataset_query(local_id, select, &options)
    }

    /// The expression of a declared metric
    pub fn expand_metric(&self, metric_id: &str) -> Option<&'a str> {
        self.doc.metric(metric_id).map(|m| m.expression.as_str())
    }

    /// A filter's condition with `{param}` placeholders substituted.
    ///
    /// Values come from `params`, then from the parameter's declared default.
    /// String parameters become quoted literals, others are inserted as-is.
    /// Placeholders without a value are left in place. Returns `None` for an
    /// unknown filter id.
    pub fn apply_filter(&self, filter_id: &str, params: &HashMap<String, String>) -> Option<String> {
        let filter = self.doc.filter(filter_id)?;

        let condition = placeholder_regex().replace_all(&filter.condition, |caps: &Captures<'_>| {
            let placeholder = &caps[0];
            let Some(param) = filter.parameters.iter().find(|p| p.name == caps[1]) else {
                return placeholder.to_string();
            };
            let value = params
                .get(&param.name)
                .cloned()
                .or_else(|| param.default.as_ref().and_then(yaml_scalar));
            match value {
                Some(value) if param.is_string() => string_literal(&value),
                Some(value) => value,
                None => {
                    log::debug!("Filter '{filter_id}': no value for {placeholder}");
                    placeholder.to_string()
                }
            }
        });

        Some(condition.into_owned())
    }

    fn assemble<S: AsRef<str>>(
        &self,
        select: &[S],
        root: &str,
        joins: Vec<String>,
        options: &QueryOptions,
    ) -> String {
        let mut parts = vec![
            self.select_clause(select),
            format!("FROM {}", self.table_ref(root)),
        ];
        parts.extend(joins);
        parts.extend(where_clause(&options.where_clauses));
        if !options.group_by.is_empty() {
            parts.push(format!("GROUP BY {}", options.group_by.join(", ")));
        }
        if !options.order_by.is_empty() {
            parts.push(format!("ORDER BY {}", options.order_by.join(", ")));
        }
        if let Some(limit) = options.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        parts.join("\n")
    }

    fn select_clause<S: AsRef<str>>(&self, select: &[S]) -> String {
        if select.is_empty() {
            return "SELECT *".to_string();
        }
        let items: Vec<String> = select
            .iter()
            .map(|item| self.select_item(item.as_ref()))
            .collect();
        format!("SELECT {}", items.join(",\n    "))
    }

    fn select_item(&self, item: &str) -> String {
        match self.doc.metric(item.trim()) {
            Some(metric) => format!("{} AS {}", metric.expression, render_ident(&metric.id)),
            None => item.to_string(),
        }
    }

    fn alias_of(&self, local_id: &str) -> String {
        let alias = self
            .doc
            .dataset(local_id)
            .map(|d| d.sql_alias())
            .unwrap_or(local_id);
        render_ident(alias)
    }

    fn table_ref(&self, local_id: &str) -> String {
        format!("{} AS {}", render_ident(local_id), self.alias_of(local_id))
    }

    fn join_clause(&self, edge: &JoinPathEdge) -> String {
        let left = self.alias_of(&edge.left_dataset);
        let right = self.alias_of(&edge.right_dataset);
        let on = if edge.conditions.is_empty() {
            log::warn!(
                "Relationship '{}' has no join conditions",
                edge.relationship_id
            );
            "TRUE".to_string()
        } else {
            edge.conditions
                .iter()
                .map(|c| {
                    format!(
                        "{left}.{} {} {right}.{}",
                        render_ident(&c.left_column),
                        c.operator,
                        render_ident(&c.right_column)
                    )
                })
                .collect::<Vec<_>>()
                .join(" AND ")
        };
        format!(
            "{} JOIN {} ON {on}",
            edge.join_type.sql_keyword(),
            self.table_ref(&edge.right_dataset)
        )
    }
}

/// Several conditions are parenthesized so an `OR` in one cannot leak into another
fn where_clause(clauses: &[String]) -> Option<String> {
    let clauses: Vec<&str> = clauses
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    match clauses.as_slice() {
        [] => None,
        [single] => Some(format!("WHERE {single}")),
        many => Some(format!(
            "WHERE {}",
            many.iter()
                .map(|c| format!("({c})"))
                .collect::<Vec<_>>()
                .join(" AND ")
        )),
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
