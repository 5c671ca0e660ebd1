//! Serialize a [`ContextDocument`] back to structured context text.

use crate::document::{
    BusinessRule, ContextDocument, ContextStatus, ContextType, DatasetRef, Filter,
    GlossaryEntry, Metric, Relationship,
};
use crate::error::CoreResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Header layout written by [`ContextDocument::to_context_text`]
#[derive(Serialize)]
struct HeaderOut<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    context_type: &'a ContextType,
    status: ContextStatus,
    #[serde(skip_serializing_if = "is_empty_slice")]
    tags: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    datasets: &'a [DatasetRef],
    #[serde(skip_serializing_if = "is_empty_slice")]
    relationships: &'a [Relationship],
    #[serde(skip_serializing_if = "is_empty_slice")]
    metrics: &'a [Metric],
    #[serde(skip_serializing_if = "is_empty_slice")]
    business_rules: &'a [BusinessRule],
    #[serde(skip_serializing_if = "is_empty_slice")]
    filters: &'a [Filter],
    #[serde(skip_serializing_if = "is_empty_mapping")]
    settings: &'a serde_yaml::Mapping,
    #[serde(skip_serializing_if = "is_empty_mapping")]
    data_model: &'a serde_yaml::Mapping,
    #[serde(skip_serializing_if = "is_empty_slice")]
    glossary: &'a [GlossaryEntry],
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

fn is_empty_mapping(mapping: &&serde_yaml::Mapping) -> bool {
    mapping.is_empty()
}

impl ContextDocument {
    /// Render the document as a YAML header followed by its body.
    ///
    /// `context_type` is always written, so re-parsing never re-infers it.
    pub fn to_context_text(&self) -> CoreResult<String> {
        let header = HeaderOut {
            name: &self.name,
            version: &self.version,
            description: &self.description,
            context_type: &self.context_type,
            status: self.status,
            tags: &self.tags,
            category: self.category.as_deref(),
            owner: self.owner.as_deref(),
            created_by: self.created_by.as_deref(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            datasets: &self.datasets,
            relationships: &self.relationships,
            metrics: &self.metrics,
            business_rules: &self.business_rules,
            filters: &self.filters,
            settings: &self.settings,
            data_model: &self.data_model,
            glossary: &self.glossary,
        };
        let yaml = serde_yaml::to_string(&header)?;
        Ok(format!("---\n{}---\n\n{}\n", yaml, self.body))
    }

    /// Copy of the document with a new version string, for publishing revisions
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            updated_at: Some(Utc::now()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "serializer_test.rs"]
mod tests;
