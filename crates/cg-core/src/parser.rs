//! Context document parsing
//!
//! Two input shapes are accepted:
//!
//! ```text
//! ---
//! [YAML header]
//! ---
//! [free-form body]
//! ```
//!
//! or free-form text only. For headerless text the header is synthesized from
//! the first `# Title`, the first paragraph, and the `## Dataset: Name (id: ...)`,
//! `## Datasets` and `## Relationships` authoring shortcuts.

use crate::document::{
    BusinessRule, ContextDocument, ContextStatus, ContextType, DatasetRef, Filter,
    GlossaryEntry, JoinCondition, JoinType, Metric, Relationship,
};
use crate::error::{CoreError, CoreResult};
use crate::fingerprint::ContentFingerprint;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Version assigned to headerless documents
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Name used when headerless text has no `# Title`
const DEFAULT_NAME: &str = "Dataset Context";

/// Description used when headerless text has no prose paragraph
const DEFAULT_DESCRIPTION: &str = "Dataset context documentation";

/// Headerless descriptions are cut to this many characters
const DESCRIPTION_LIMIT: usize = 200;

/// Local id given to the dataset synthesized from a caller-supplied default
const FALLBACK_LOCAL_ID: &str = "main";

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"))
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*$").expect("valid regex"))
}

fn dataset_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^##[ \t]+dataset:[ \t]*(.+?)[ \t]+\(id:[ \t]*([\w-]+)\)")
            .expect("valid regex")
    })
}

fn dataset_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^##[ \t]+datasets?[ \t]*\r?\n((?:[ \t]*[-*][ \t]+.*(?:\r?\n|$))+)")
            .expect("valid regex")
    })
}

fn dataset_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[-*][ \t]+(.+?)[ \t]+\(id:[ \t]*([\w-]+)\)").expect("valid regex")
    })
}

fn relationship_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?im)^##[ \t]+relationships?[ \t]*\r?\n((?:[ \t]*[-*][ \t]+.*(?:\r?\n|$))+)",
        )
        .expect("valid regex")
    })
}

fn relationship_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[-*][ \t]+(\w+)[ \t]*(?:→|->)[ \t]*(\w+)[ \t]+via[ \t]+(\w+)")
            .expect("valid regex")
    })
}

/// The two accepted document shapes, split but not yet interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentParts<'a> {
    /// A `---` delimited YAML header followed by a body
    Structured { header: &'a str, body: &'a str },
    /// Free-form text only
    Headerless { body: &'a str },
}

/// Split raw text into header and body.
///
/// Text whose first line is `---` must close the header with another `---`
/// line; an unterminated header is malformed rather than headerless.
pub fn split_document(text: &str) -> CoreResult<DocumentParts<'_>> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(DocumentParts::Headerless { body: text.trim() });
    };
    if first.trim_end() != "---" {
        return Ok(DocumentParts::Headerless { body: text.trim() });
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == "---" {
            return Ok(DocumentParts::Structured {
                header: &text[header_start..offset],
                body: text[offset + line.len()..].trim(),
            });
        }
        offset += line.len();
    }

    Err(CoreError::MalformedHeader {
        message: "header opened with '---' is never closed".to_string(),
    })
}

/// Header fields exactly as authored, before required-field checks
#[derive(Debug, Default, Deserialize)]
struct RawHeader {
    name: Option<String>,
    version: Option<serde_yaml::Value>,
    description: Option<String>,
    context_type: Option<ContextType>,
    status: Option<ContextStatus>,
    tags: Option<Vec<String>>,
    category: Option<String>,
    owner: Option<String>,
    created_by: Option<String>,
    created_at: Option<serde_yaml::Value>,
    updated_at: Option<serde_yaml::Value>,
    datasets: Option<Vec<DatasetRef>>,
    relationships: Option<Vec<RawRelationship>>,
    metrics: Option<Vec<Metric>>,
    filters: Option<Vec<Filter>>,
    business_rules: Option<Vec<BusinessRule>>,
    glossary: Option<Vec<GlossaryEntry>>,
    settings: Option<serde_yaml::Mapping>,
    data_model: Option<serde_yaml::Mapping>,
}

/// Relationship as authored; accepts the `from_*`/`to_*` shorthand
#[derive(Debug, Default, Deserialize)]
struct RawRelationship {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "from_dataset")]
    left_dataset: Option<String>,
    #[serde(default, alias = "to_dataset")]
    right_dataset: Option<String>,
    #[serde(default)]
    join_type: Option<JoinType>,
    #[serde(default)]
    conditions: Vec<JoinCondition>,
    #[serde(default)]
    from_column: Option<String>,
    #[serde(default)]
    to_column: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parse a context document.
///
/// `default_dataset_id` is only consulted for headerless text that declares no
/// datasets of its own.
pub fn parse(text: &str, default_dataset_id: Option<&str>) -> CoreResult<ContextDocument> {
    let (raw, body) = match split_document(text)? {
        DocumentParts::Structured { header, body } => {
            log::debug!("Parsing structured context ({} header bytes)", header.len());
            (parse_header(header)?, body)
        }
        DocumentParts::Headerless { body } => {
            log::debug!("Parsing headerless context ({} bytes)", body.len());
            (synthesize_header(body, default_dataset_id)?, body)
        }
    };
    normalize(raw, body, text)
}

impl ContextDocument {
    /// Parse a context document; see [`parse`]
    pub fn parse(text: &str, default_dataset_id: Option<&str>) -> CoreResult<Self> {
        parse(text, default_dataset_id)
    }

    /// Read and parse a context document from disk
    pub fn from_file(
        path: &std::path::Path,
        default_dataset_id: Option<&str>,
    ) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        parse(&content, default_dataset_id)
    }
}

/// Check a version string against `MAJOR.MINOR.PATCH`
pub fn is_semantic_version(version: &str) -> bool {
    version_re().is_match(version)
}

fn parse_header(header: &str) -> CoreResult<RawHeader> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(header).map_err(|e| CoreError::MalformedHeader {
            message: e.to_string(),
        })?;
    if !value.is_mapping() {
        return Err(CoreError::MalformedHeader {
            message: "header must be a YAML mapping".to_string(),
        });
    }
    serde_yaml::from_value(value).map_err(|e| CoreError::MalformedHeader {
        message: e.to_string(),
    })
}

fn synthesize_header(body: &str, default_dataset_id: Option<&str>) -> CoreResult<RawHeader> {
    let name = title_re()
        .captures(body)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let description = body
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))
        .map(|p| p.chars().take(DESCRIPTION_LIMIT).collect::<String>())
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let mut datasets = extract_datasets(body);
    if datasets.is_empty() {
        let Some(external_id) = default_dataset_id else {
            return Err(CoreError::NoDatasetsFound);
        };
        log::debug!("No dataset shortcuts found, using default dataset {external_id}");
        datasets.push(DatasetRef {
            local_id: FALLBACK_LOCAL_ID.to_string(),
            display_name: name.clone(),
            external_id: external_id.to_string(),
            alias: None,
            description: None,
            columns: Vec::new(),
        });
    }

    Ok(RawHeader {
        name: Some(name),
        version: Some(serde_yaml::Value::String(DEFAULT_VERSION.to_string())),
        description: Some(description),
        status: Some(ContextStatus::Active),
        datasets: Some(datasets),
        relationships: Some(extract_relationships(body)),
        ..RawHeader::default()
    })
}

/// `Orders Archive` becomes `orders_archive`
fn local_id_for(display_name: &str) -> String {
    display_name.to_lowercase().replace(' ', "_")
}

fn dataset_shortcut(display_name: &str, external_id: &str) -> DatasetRef {
    let display_name = display_name.trim();
    DatasetRef {
        local_id: local_id_for(display_name),
        display_name: display_name.to_string(),
        external_id: external_id.trim().to_string(),
        alias: None,
        description: None,
        columns: Vec::new(),
    }
}

fn extract_datasets(body: &str) -> Vec<DatasetRef> {
    let mut datasets: Vec<DatasetRef> = dataset_heading_re()
        .captures_iter(body)
        .map(|c| dataset_shortcut(&c[1], &c[2]))
        .collect();

    if let Some(list) = dataset_list_re().captures(body) {
        datasets.extend(
            dataset_item_re()
                .captures_iter(&list[1])
                .map(|c| dataset_shortcut(&c[1], &c[2])),
        );
    }

    datasets
}

fn extract_relationships(body: &str) -> Vec<RawRelationship> {
    let Some(list) = relationship_list_re().captures(body) else {
        return Vec::new();
    };

    relationship_item_re()
        .captures_iter(&list[1])
        .map(|c| {
            let left = c[1].to_lowercase();
            let right = c[2].to_lowercase();
            let column = c[3].to_string();
            RawRelationship {
                id: Some(format!("{left}_{right}")),
                name: Some(format!("{} to {}", &c[1], &c[2])),
                description: Some(format!(
                    "Relationship from {left} to {right} via {column}"
                )),
                left_dataset: Some(left),
                right_dataset: Some(right),
                join_type: Some(JoinType::Inner),
                conditions: vec![JoinCondition::same_column(&column)],
                ..RawRelationship::default()
            }
        })
        .collect()
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), or a bare date.
fn normalize_timestamp(field: &str, value: Option<&serde_yaml::Value>) -> Option<DateTime<Utc>> {
    let raw = scalar_to_string(value?)?;
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(midnight.and_utc());
    }
    log::warn!("Ignoring unparseable '{field}' timestamp: {raw}");
    None
}

fn normalize_relationship(raw: RawRelationship) -> Relationship {
    let left_dataset = raw.left_dataset.unwrap_or_default();
    let right_dataset = raw.right_dataset.unwrap_or_default();

    let mut conditions = raw.conditions;
    if conditions.is_empty() {
        if let (Some(left_column), Some(right_column)) = (raw.from_column, raw.to_column) {
            conditions.push(JoinCondition {
                left_column,
                operator: "=".to_string(),
                right_column,
            });
        }
    }

    Relationship {
        id: raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{left_dataset}_{right_dataset}")),
        name: raw.name,
        left_dataset,
        right_dataset,
        join_type: raw.join_type.unwrap_or_default(),
        conditions,
        description: raw.description,
    }
}

/// Collect every absent required field so the author sees them all at once
fn missing_fields(raw: &RawHeader) -> Vec<String> {
    let mut missing = Vec::new();
    if raw.name.is_none() {
        missing.push("name".to_string());
    }
    if raw.version.as_ref().is_none_or(|v| v.is_null()) {
        missing.push("version".to_string());
    }
    if raw.description.is_none() {
        missing.push("description".to_string());
    }
    match &raw.datasets {
        None => missing.push("datasets".to_string()),
        Some(datasets) => {
            for (i, ds) in datasets.iter().enumerate() {
                if ds.local_id.trim().is_empty() {
                    missing.push(format!("datasets[{i}].id"));
                }
            }
        }
    }
    for (i, rel) in raw.relationships.iter().flatten().enumerate() {
        if rel.left_dataset.as_deref().is_none_or(str::is_empty) {
            missing.push(format!("relationships[{i}].left_dataset"));
        }
        if rel.right_dataset.as_deref().is_none_or(str::is_empty) {
            missing.push(format!("relationships[{i}].right_dataset"));
        }
    }
    for (i, metric) in raw.metrics.iter().flatten().enumerate() {
        if metric.id.is_empty() {
            missing.push(format!("metrics[{i}].id"));
        }
        if metric.expression.trim().is_empty() {
            missing.push(format!("metrics[{i}].expression"));
        }
    }
    for (i, filter) in raw.filters.iter().flatten().enumerate() {
        if filter.id.is_empty() {
            missing.push(format!("filters[{i}].id"));
        }
        if filter.condition.trim().is_empty() {
            missing.push(format!("filters[{i}].condition"));
        }
    }
    for (i, entry) in raw.glossary.iter().flatten().enumerate() {
        if entry.term.trim().is_empty() {
            missing.push(format!("glossary[{i}].term"));
        }
    }
    missing
}

fn normalize(raw: RawHeader, body: &str, text: &str) -> CoreResult<ContextDocument> {
    let missing = missing_fields(&raw);
    if !missing.is_empty() {
        return Err(CoreError::MissingRequiredField { fields: missing });
    }

    let version = match raw.version.as_ref().and_then(scalar_to_string) {
        Some(v) => v,
        None => {
            return Err(CoreError::MalformedHeader {
                message: "'version' must be a scalar value".to_string(),
            })
        }
    };
    if !is_semantic_version(&version) {
        return Err(CoreError::InvalidVersionFormat { version });
    }

    let created_at = normalize_timestamp("created_at", raw.created_at.as_ref());
    let updated_at = normalize_timestamp("updated_at", raw.updated_at.as_ref());

    let mut datasets = raw.datasets.unwrap_or_default();
    if datasets.is_empty() {
        return Err(CoreError::NoDatasetsFound);
    }
    for ds in &mut datasets {
        if ds.display_name.is_empty() {
            ds.display_name = ds.local_id.clone();
        }
    }

    let relationships: Vec<Relationship> = raw
        .relationships
        .unwrap_or_default()
        .into_iter()
        .map(normalize_relationship)
        .collect();

    let context_type = raw
        .context_type
        .unwrap_or_else(|| ContextType::infer(datasets.len(), relationships.len()));

    let fingerprint = ContentFingerprint::of(text);

    Ok(ContextDocument {
        name: raw.name.unwrap_or_default(),
        version,
        description: raw.description.unwrap_or_default(),
        context_type,
        status: raw.status.unwrap_or_default(),
        tags: raw.tags.unwrap_or_default(),
        category: raw.category,
        owner: raw.owner,
        created_by: raw.created_by,
        created_at,
        updated_at,
        datasets,
        relationships,
        metrics: raw.metrics.unwrap_or_default(),
        filters: raw.filters.unwrap_or_default(),
        business_rules: raw.business_rules.unwrap_or_default(),
        glossary: raw.glossary.unwrap_or_default(),
        settings: raw.settings.unwrap_or_default(),
        data_model: raw.data_model.unwrap_or_default(),
        body: body.to_string(),
        content_hash: fingerprint.hash,
        content_length: fingerprint.length,
    })
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
