//! Structural and semantic validation of parsed context documents
//!
//! Four passes run in order and all of them always run, so a single call
//! reports every problem in the document:
//!
//! 1. schema: name, description and context type
//! 2. semantic: dataset ids, external dataset existence, column references
//! 3. graph (multi-dataset only): join types, cycles, duplicate edges
//! 4. rules: business rule severity, type and condition

use crate::document::{ContextDocument, ContextType};
use crate::graph::find_directed_cycle;
use crate::lookup::{DatasetSchema, SchemaLookup};
use crate::validation::{IssueCode, ValidationResult};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 100;
const DESCRIPTION_MIN_LEN: usize = 10;

/// Validates documents on behalf of one principal
pub struct ContextValidator<'a, L: SchemaLookup + ?Sized> {
    lookup: &'a L,
    owner: &'a str,
}

impl<'a, L: SchemaLookup + ?Sized> ContextValidator<'a, L> {
    pub fn new(lookup: &'a L, owner: &'a str) -> Self {
        Self { lookup, owner }
    }

    /// Run every pass and return the accumulated result
    pub fn validate(&self, doc: &ContextDocument) -> ValidationResult {
        let mut result = ValidationResult::new();

        self.check_schema(doc, &mut result);
        log::debug!("Schema pass: {} error(s)", result.error_count());

        let schemas = self.check_datasets(doc, &mut result);
        self.check_relationship_references(doc, &schemas, &mut result);
        self.check_metric_references(doc, &mut result);
        log::debug!(
            "Semantic pass: {} dataset(s) resolved, {} error(s) so far",
            schemas.len(),
            result.error_count()
        );

        if doc.context_type == ContextType::MultiDataset {
            self.check_graph(doc, &mut result);
            log::debug!(
                "Graph pass: {} error(s), {} warning(s) so far",
                result.error_count(),
                result.warning_count()
            );
        }

        self.check_rules(doc, &mut result);
        log::debug!(
            "Validation of '{}' finished: {} ({} error(s), {} warning(s))",
            doc.name,
            result.status(),
            result.error_count(),
            result.warning_count()
        );

        result
    }

    fn check_schema(&self, doc: &ContextDocument, result: &mut ValidationResult) {
        let name_len = doc.name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            result
                .error(
                    IssueCode::InvalidName,
                    format!(
                        "Context name must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters, got: {name_len}"
                    ),
                    "name",
                )
                .detail("length", name_len);
        }

        let description_len = doc.description.chars().count();
        if description_len < DESCRIPTION_MIN_LEN {
            result
                .error(
                    IssueCode::InvalidDescription,
                    format!(
                        "Description must be at least {DESCRIPTION_MIN_LEN} characters, got: {description_len}"
                    ),
                    "description",
                )
                .detail("length", description_len);
        }

        if !doc.context_type.is_recognized() {
            result
                .error(
                    IssueCode::InvalidContextType,
                    format!("Invalid context_type: {}", doc.context_type),
                    "context_type",
                )
                .detail("allowed", ContextType::RECOGNIZED.to_vec());
        }
    }

    /// Resolve every declared dataset, returning schemas keyed by local id
    fn check_datasets(
        &self,
        doc: &ContextDocument,
        result: &mut ValidationResult,
    ) -> HashMap<String, DatasetSchema> {
        let mut schemas = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for ds in &doc.datasets {
            if !seen.insert(ds.local_id.as_str()) {
                result
                    .error(
                        IssueCode::DuplicateDatasetId,
                        format!("Dataset id '{}' is declared more than once", ds.local_id),
                        "datasets",
                    )
                    .detail("id", ds.local_id.as_str());
                continue;
            }

            let external_id = ds.external_id.trim();
            if external_id.is_empty() {
                result
                    .error(
                        IssueCode::MissingDatasetId,
                        format!("Dataset '{}' missing dataset_id", ds.local_id),
                        "datasets",
                    )
                    .detail("id", ds.local_id.as_str());
                continue;
            }

            if Uuid::parse_str(external_id).is_err() {
                result
                    .error(
                        IssueCode::InvalidDatasetId,
                        format!(
                            "Invalid UUID for dataset '{}': {}",
                            ds.local_id, external_id
                        ),
                        "datasets",
                    )
                    .detail("id", ds.local_id.as_str())
                    .detail("dataset_id", external_id);
                continue;
            }

            match self.lookup.resolve(external_id, self.owner) {
                Some(schema) => {
                    schemas.insert(ds.local_id.clone(), schema);
                }
                None => {
                    result
                        .error(
                            IssueCode::DatasetNotFound,
                            format!(
                                "Dataset '{}' with ID {} not found or not owned by {}",
                                ds.display_name, external_id, self.owner
                            ),
                            "datasets",
                        )
                        .detail("dataset_id", external_id);
                }
            }
        }

        schemas
    }

    fn check_relationship_references(
        &self,
        doc: &ContextDocument,
        schemas: &HashMap<String, DatasetSchema>,
        result: &mut ValidationResult,
    ) {
        let declared: HashSet<&str> = doc.datasets.iter().map(|d| d.local_id.as_str()).collect();

        for rel in &doc.relationships {
            let mut known = true;
            for side in [&rel.left_dataset, &rel.right_dataset] {
                if !declared.contains(side.as_str()) {
                    known = false;
                    result
                        .error(
                            IssueCode::UnknownDatasetInRelationship,
                            format!(
                                "Relationship '{}' references unknown dataset: {}",
                                rel.id, side
                            ),
                            "relationships",
                        )
                        .detail("relationship", rel.id.as_str())
                        .detail("dataset", side.as_str());
                }
            }
            if !known {
                continue;
            }

            // Columns are only checked when both sides resolved with a known schema
            let (Some(left), Some(right)) = (
                usable_schema(schemas, &rel.left_dataset),
                usable_schema(schemas, &rel.right_dataset),
            ) else {
                continue;
            };

            for cond in &rel.conditions {
                for (dataset, schema, column) in [
                    (&rel.left_dataset, left, &cond.left_column),
                    (&rel.right_dataset, right, &cond.right_column),
                ] {
                    if column.is_empty() || schema.has_column(column) {
                        continue;
                    }
                    result
                        .error(
                            IssueCode::ColumnNotFound,
                            format!("Column '{column}' not found in dataset '{dataset}'"),
                            "relationships",
                        )
                        .detail("relationship", rel.id.as_str())
                        .detail("dataset", dataset.as_str())
                        .detail("column", column.as_str());
                }
            }
        }
    }

    fn check_metric_references(&self, doc: &ContextDocument, result: &mut ValidationResult) {
        for metric in &doc.metrics {
            for local_id in &metric.datasets {
                if doc.dataset(local_id).is_some() {
                    continue;
                }
                result
                    .warning(
                        IssueCode::UnknownDatasetInMetric,
                        format!(
                            "Metric '{}' references unknown dataset: {}",
                            metric.id, local_id
                        ),
                        "metrics",
                    )
                    .detail("metric", metric.id.as_str())
                    .detail("dataset", local_id.as_str());
            }
        }
    }

    fn check_graph(&self, doc: &ContextDocument, result: &mut ValidationResult) {
        if doc.relationships.is_empty() {
            result.warning(
                IssueCode::NoRelationships,
                "Multi-dataset context has no relationships defined",
                "relationships",
            );
            return;
        }

        for rel in &doc.relationships {
            if !rel.join_type.is_recognized() {
                result
                    .error(
                        IssueCode::InvalidJoinType,
                        format!(
                            "Invalid join_type in relationship '{}': {}",
                            rel.id, rel.join_type
                        ),
                        "relationships",
                    )
                    .detail("relationship", rel.id.as_str());
            }
        }

        if let Some(cycle) = find_directed_cycle(&doc.relationships) {
            result
                .error(
                    IssueCode::CircularDependency,
                    format!(
                        "Circular dependency detected in relationships: {}",
                        cycle.join(" → ")
                    ),
                    "relationships",
                )
                .detail("cycle", cycle);
        }

        let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
        for rel in &doc.relationships {
            let pair = (rel.left_dataset.as_str(), rel.right_dataset.as_str());
            if !seen_pairs.insert(pair) {
                result
                    .warning(
                        IssueCode::DuplicateRelationship,
                        format!(
                            "Duplicate relationship between '{}' and '{}'",
                            pair.0, pair.1
                        ),
                        "relationships",
                    )
                    .detail("left", pair.0)
                    .detail("right", pair.1);
            }
        }
    }

    fn check_rules(&self, doc: &ContextDocument, result: &mut ValidationResult) {
        for rule in &doc.business_rules {
            if !rule.severity.as_ref().is_some_and(|s| s.is_recognized()) {
                result
                    .error(
                        IssueCode::InvalidSeverity,
                        format!(
                            "Invalid severity in rule '{}': {}",
                            rule.id,
                            rule.severity.as_ref().map_or("none", |s| s.as_str())
                        ),
                        "business_rules",
                    )
                    .detail("rule", rule.id.as_str());
            }

            if !rule.rule_type.as_ref().is_some_and(|t| t.is_recognized()) {
                result
                    .error(
                        IssueCode::InvalidRuleType,
                        format!(
                            "Invalid rule_type in rule '{}': {}",
                            rule.id,
                            rule.rule_type.as_ref().map_or("none", |t| t.as_str())
                        ),
                        "business_rules",
                    )
                    .detail("rule", rule.id.as_str());
            }

            if rule.condition.trim().is_empty() {
                result
                    .error(
                        IssueCode::EmptyRuleCondition,
                        format!("Rule '{}' has empty condition", rule.id),
                        "business_rules",
                    )
                    .detail("rule", rule.id.as_str());
            }
        }
    }
}

/// A resolved schema that actually lists columns
fn usable_schema<'s>(
    schemas: &'s HashMap<String, DatasetSchema>,
    local_id: &str,
) -> Option<&'s DatasetSchema> {
    schemas.get(local_id).filter(|s| !s.columns.is_empty())
}

/// Validate a document for `owner` against `lookup`
pub fn validate<L: SchemaLookup + ?Sized>(
    doc: &ContextDocument,
    lookup: &L,
    owner: &str,
) -> ValidationResult {
    ContextValidator::new(lookup, owner).validate(doc)
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
