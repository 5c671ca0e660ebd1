//! Normalized context document model
//!
//! A [`ContextDocument`] is produced once per parse call and is never mutated
//! afterwards: validation, resolution and SQL generation all borrow it.
//! Optional collections are always present as (possibly empty) vectors.

use crate::open_enum::define_open_enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_open_enum! {
    /// Whether a context documents one dataset or a set of related datasets
    pub enum ContextType {
        /// Rich documentation for a single dataset
        SingleDataset => "single_dataset",
        /// Relationship definitions across several datasets
        MultiDataset => "multi_dataset",
    }
}

impl ContextType {
    /// Infer the context type from what the document declares.
    ///
    /// Exactly one dataset and no relationships is a single-dataset context;
    /// anything else is multi-dataset.
    pub fn infer(dataset_count: usize, relationship_count: usize) -> Self {
        if dataset_count == 1 && relationship_count == 0 {
            ContextType::SingleDataset
        } else {
            ContextType::MultiDataset
        }
    }
}

define_open_enum! {
    /// SQL join flavour declared on a relationship
    pub enum JoinType {
        Inner => "inner",
        Left => "left",
        Right => "right",
        Outer => "outer",
    }
}

impl Default for JoinType {
    fn default() -> Self {
        JoinType::Inner
    }
}

impl JoinType {
    /// The join type seen when the relationship is walked right-to-left.
    ///
    /// One-sided joins swap sides so the retained rows stay the same.
    pub fn mirrored(&self) -> Self {
        match self {
            JoinType::Left => JoinType::Right,
            JoinType::Right => JoinType::Left,
            other => other.clone(),
        }
    }

    /// Keyword used in a `... JOIN` clause
    pub fn sql_keyword(&self) -> String {
        match self {
            JoinType::Outer => "FULL OUTER".to_string(),
            other => other.as_str().to_ascii_uppercase(),
        }
    }
}

define_open_enum! {
    /// Severity attached to a business rule
    pub enum RuleSeverity {
        Error => "error",
        Warning => "warning",
        Info => "info",
    }
}

define_open_enum! {
    /// Category of a business rule
    pub enum RuleType {
        Validation => "validation",
        Quality => "quality",
        Constraint => "constraint",
    }
}

/// Lifecycle status of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContextStatus {
    Draft,
    #[default]
    Active,
    Deprecated,
}

impl std::fmt::Display for ContextStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextStatus::Draft => write!(f, "draft"),
            ContextStatus::Active => write!(f, "active"),
            ContextStatus::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// A column annotation on a dataset reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

/// A dataset alias local to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Key used by relationships, metrics and rules
    #[serde(rename = "id", default)]
    pub local_id: String,
    /// Human-readable name
    #[serde(rename = "name", default)]
    pub display_name: String,
    /// Opaque reference resolved by the external dataset store
    #[serde(rename = "dataset_id", default)]
    pub external_id: String,
    /// SQL alias used in generated queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnRef>,
}

impl DatasetRef {
    /// The SQL alias, falling back to the local id
    pub fn sql_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.local_id)
    }
}

/// One `left <op> right` predicate of a join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left_column: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    pub right_column: String,
}

fn default_operator() -> String {
    "=".to_string()
}

impl JoinCondition {
    /// Equality condition on the same column name in both datasets
    pub fn same_column(column: &str) -> Self {
        Self {
            left_column: column.to_string(),
            operator: default_operator(),
            right_column: column.to_string(),
        }
    }

    /// The condition with its sides exchanged
    pub fn swapped(&self) -> Self {
        Self {
            left_column: self.right_column.clone(),
            operator: self.operator.clone(),
            right_column: self.left_column.clone(),
        }
    }
}

/// A declared edge between two datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub left_dataset: String,
    pub right_dataset: String,
    #[serde(default)]
    pub join_type: JoinType,
    #[serde(default)]
    pub conditions: Vec<JoinCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relationship {
    /// Whether the relationship touches the given local dataset id
    pub fn involves(&self, local_id: &str) -> bool {
        self.left_dataset == local_id || self.right_dataset == local_id
    }
}

/// A named, reusable SQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Local dataset ids this metric applies to; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Metric {
    /// Whether the metric applies to the given local dataset id
    pub fn applies_to(&self, local_id: &str) -> bool {
        self.datasets.is_empty() || self.datasets.iter().any(|d| d == local_id)
    }
}

/// A named placeholder inside a filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParameter {
    pub name: String,
    #[serde(default = "default_parameter_type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
}

fn default_parameter_type() -> String {
    "string".to_string()
}

impl FilterParameter {
    /// String parameters are substituted as quoted literals
    pub fn is_string(&self) -> bool {
        self.data_type.eq_ignore_ascii_case("string")
    }
}

/// A reusable, optionally parameterized WHERE condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<FilterParameter>,
}

/// A declarative data rule checked by downstream quality tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRule {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<RuleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<RuleSeverity>,
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
}

/// A business term and its definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
}

impl GlossaryEntry {
    /// Case-insensitive substring match against the term and its synonyms
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.term.to_lowercase().contains(&needle)
            || self
                .synonyms
                .iter()
                .any(|s| s.to_lowercase().contains(&needle))
    }
}

/// The normalized result of parsing a context document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextDocument {
    pub name: String,
    pub version: String,
    pub description: String,
    pub context_type: ContextType,
    pub status: ContextStatus,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub datasets: Vec<DatasetRef>,
    pub relationships: Vec<Relationship>,
    pub metrics: Vec<Metric>,
    pub filters: Vec<Filter>,
    pub business_rules: Vec<BusinessRule>,
    pub glossary: Vec<GlossaryEntry>,
    pub settings: serde_yaml::Mapping,
    pub data_model: serde_yaml::Mapping,
    /// Free-form prose following the header (or the whole headerless text)
    pub body: String,
    /// SHA-256 of the raw input, hex encoded
    pub content_hash: String,
    /// Size of the raw input in bytes
    pub content_length: usize,
}

/// Counts reported alongside a stored context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub datasets: usize,
    pub relationships: usize,
    pub metrics: usize,
    pub filters: usize,
    pub business_rules: usize,
    pub glossary: usize,
}

impl ContextDocument {
    /// Look up a dataset by local id
    pub fn dataset(&self, local_id: &str) -> Option<&DatasetRef> {
        self.datasets.iter().find(|d| d.local_id == local_id)
    }

    /// Look up a relationship by id
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Look up a metric by id
    pub fn metric(&self, id: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.id == id)
    }

    /// Look up a filter by id
    pub fn filter(&self, id: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.id == id)
    }

    /// Metrics applicable to one dataset (metrics without a dataset list apply everywhere)
    pub fn metrics_for_dataset(&self, local_id: &str) -> Vec<&Metric> {
        self.metrics.iter().filter(|m| m.applies_to(local_id)).collect()
    }

    /// Glossary entries whose term or synonyms contain `term`
    pub fn search_glossary(&self, term: &str) -> Vec<&GlossaryEntry> {
        self.glossary.iter().filter(|g| g.matches(term)).collect()
    }

    pub fn is_multi_dataset(&self) -> bool {
        self.context_type == ContextType::MultiDataset
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            datasets: self.datasets.len(),
            relationships: self.relationships.len(),
            metrics: self.metrics.len(),
            filters: self.filters.len(),
            business_rules: self.business_rules.len(),
            glossary: self.glossary.len(),
        }
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
