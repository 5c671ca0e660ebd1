use super::*;
use crate::lookup::StaticSchemaLookup;
use crate::validation::{Severity, ValidationStatus};

const ORDERS_ID: &str = "11111111-1111-4111-8111-111111111111";
const CUSTOMERS_ID: &str = "22222222-2222-4222-8222-222222222222";
const PRODUCTS_ID: &str = "33333333-3333-4333-8333-333333333333";

fn catalog() -> StaticSchemaLookup {
    StaticSchemaLookup::new()
        .with_dataset(
            ORDERS_ID,
            "alice",
            &[
                ("id", "integer"),
                ("customer_id", "integer"),
                ("product_id", "integer"),
                ("amount", "double"),
            ],
        )
        .with_dataset(CUSTOMERS_ID, "alice", &[("id", "integer"), ("name", "varchar")])
        .with_dataset(PRODUCTS_ID, "alice", &[("id", "integer"), ("sku", "varchar")])
}

fn doc(text: &str) -> ContextDocument {
    ContextDocument::parse(text, None).unwrap()
}

fn multi(relationships: &str) -> ContextDocument {
    doc(&format!(
        r#"---
name: Sales Analytics
version: 1.0.0
description: Orders, customers and products
context_type: multi_dataset
datasets:
  - id: a
    dataset_id: {ORDERS_ID}
  - id: b
    dataset_id: {CUSTOMERS_ID}
  - id: c
    dataset_id: {PRODUCTS_ID}
relationships:
{relationships}
---
"#
    ))
}

const VALID: &str = r#"---
name: Sales Analytics
version: 1.0.0
description: Orders joined to customers and products
datasets:
  - id: orders
    dataset_id: 11111111-1111-4111-8111-111111111111
  - id: customers
    dataset_id: 22222222-2222-4222-8222-222222222222
  - id: products
    dataset_id: 33333333-3333-4333-8333-333333333333
relationships:
  - id: orders_customers
    left_dataset: orders
    right_dataset: customers
    join_type: left
    conditions:
      - left_column: customer_id
        right_column: id
  - id: orders_products
    left_dataset: orders
    right_dataset: products
    conditions:
      - left_column: product_id
        right_column: id
metrics:
  - id: revenue
    name: Revenue
    expression: SUM(orders.amount)
    datasets: [orders]
business_rules:
  - id: positive_amount
    rule_type: validation
    severity: error
    condition: amount > 0
---
"#;

#[test]
fn test_valid_document_passes() {
    let result = validate(&doc(VALID), &catalog(), "alice");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.status(), ValidationStatus::Passed);
}

#[test]
fn test_schema_pass() {
    let text = r#"---
name: ab
version: 1.0.0
description: short
context_type: snowflake
datasets:
  - id: orders
    dataset_id: 11111111-1111-4111-8111-111111111111
---
"#;
    let result = validate(&doc(text), &catalog(), "alice");
    assert!(result.has_code(IssueCode::InvalidName));
    assert!(result.has_code(IssueCode::InvalidDescription));
    assert!(result.has_code(IssueCode::InvalidContextType));
    assert_eq!(result.status(), ValidationStatus::Failed);
}

#[test]
fn test_name_too_long() {
    let name = "n".repeat(101);
    let text = format!(
        "---\nname: {name}\nversion: 1.0.0\ndescription: Long enough description\ndatasets:\n  - id: orders\n    dataset_id: {ORDERS_ID}\n---\n"
    );
    let result = validate(&doc(&text), &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::InvalidName), 1);
    assert_eq!(result.errors[0].details["length"], 101);
}

#[test]
fn test_dataset_id_checks() {
    let text = r#"---
name: Dataset checks
version: 1.0.0
description: Every flavour of bad dataset id
datasets:
  - id: missing
  - id: malformed
    dataset_id: not-a-uuid
  - id: unknown
    dataset_id: 44444444-4444-4444-8444-444444444444
  - id: orders
    dataset_id: 11111111-1111-4111-8111-111111111111
  - id: orders
    dataset_id: 11111111-1111-4111-8111-111111111111
---
"#;
    let result = validate(&doc(text), &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::MissingDatasetId), 1);
    assert_eq!(result.count_code(IssueCode::InvalidDatasetId), 1);
    assert_eq!(result.count_code(IssueCode::DatasetNotFound), 1);
    assert_eq!(result.count_code(IssueCode::DuplicateDatasetId), 1);
}

#[test]
fn test_dataset_owned_by_someone_else() {
    let result = validate(&doc(VALID), &catalog(), "bob");
    assert_eq!(result.count_code(IssueCode::DatasetNotFound), 3);
    // no schema resolved, so columns are never checked
    assert!(!result.has_code(IssueCode::ColumnNotFound));
}

#[test]
fn test_column_not_found() {
    let text = VALID.replace("left_column: customer_id", "left_column: cust_id");
    let result = validate(&doc(&text), &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::ColumnNotFound), 1);
    let issue = &result.errors[0];
    assert_eq!(issue.details["dataset"], "orders");
    assert_eq!(issue.details["column"], "cust_id");
    assert_eq!(issue.details["relationship"], "orders_customers");
}

#[test]
fn test_columns_skipped_when_schema_has_no_columns() {
    let lookup = StaticSchemaLookup::new()
        .with_dataset(ORDERS_ID, "alice", &[])
        .with_dataset(CUSTOMERS_ID, "alice", &[("id", "integer")])
        .with_dataset(PRODUCTS_ID, "alice", &[("id", "integer")]);
    let text = VALID.replace("left_column: customer_id", "left_column: cust_id");
    let result = validate(&doc(&text), &lookup, "alice");
    assert!(!result.has_code(IssueCode::ColumnNotFound));
}

#[test]
fn test_unknown_dataset_in_relationship() {
    let result = validate(
        &multi("  - left_dataset: a\n    right_dataset: z\n    join_type: inner\n"),
        &catalog(),
        "alice",
    );
    assert_eq!(result.count_code(IssueCode::UnknownDatasetInRelationship), 1);
    assert_eq!(result.errors[0].details["dataset"], "z");
}

#[test]
fn test_unknown_dataset_in_metric_is_warning() {
    let text = VALID.replace("datasets: [orders]", "datasets: [orders, refunds]");
    let result = validate(&doc(&text), &catalog(), "alice");
    assert!(result.passed());
    assert_eq!(result.count_code(IssueCode::UnknownDatasetInMetric), 1);
    assert_eq!(result.warnings[0].severity, Severity::Warning);
}

#[test]
fn test_cycle_reported_once_with_all_nodes() {
    let result = validate(
        &multi(
            "  - left_dataset: a\n    right_dataset: b\n  - left_dataset: b\n    right_dataset: c\n  - left_dataset: c\n    right_dataset: a\n",
        ),
        &catalog(),
        "alice",
    );
    assert_eq!(result.count_code(IssueCode::CircularDependency), 1);
    let issue = result
        .errors
        .iter()
        .find(|i| i.code == IssueCode::CircularDependency)
        .unwrap();
    let cycle: Vec<&str> = issue.details["cycle"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    for node in ["a", "b", "c"] {
        assert!(cycle.contains(&node), "{node} missing from {cycle:?}");
    }
    assert!(issue.message.contains("a → b → c → a"));
}

#[test]
fn test_invalid_join_type() {
    let result = validate(
        &multi("  - left_dataset: a\n    right_dataset: b\n    join_type: cross\n"),
        &catalog(),
        "alice",
    );
    assert_eq!(result.count_code(IssueCode::InvalidJoinType), 1);
    assert!(result.errors[0].message.contains("cross"));
}

#[test]
fn test_duplicate_relationship_is_warning() {
    let result = validate(
        &multi(
            "  - id: first\n    left_dataset: a\n    right_dataset: b\n  - id: second\n    left_dataset: a\n    right_dataset: b\n",
        ),
        &catalog(),
        "alice",
    );
    assert!(result.passed());
    assert_eq!(result.count_code(IssueCode::DuplicateRelationship), 1);
    assert_eq!(result.status(), ValidationStatus::Warning);
}

#[test]
fn test_multi_dataset_without_relationships_warns() {
    let text = format!(
        "---\nname: Loose datasets\nversion: 1.0.0\ndescription: Two unrelated datasets\ndatasets:\n  - id: a\n    dataset_id: {ORDERS_ID}\n  - id: b\n    dataset_id: {CUSTOMERS_ID}\n---\n"
    );
    let result = validate(&doc(&text), &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::NoRelationships), 1);
    assert_eq!(result.status(), ValidationStatus::Warning);
}

#[test]
fn test_graph_pass_skipped_for_single_dataset() {
    let text = format!(
        "---\nname: One dataset\nversion: 1.0.0\ndescription: Explicitly single dataset\ncontext_type: single_dataset\ndatasets:\n  - id: a\n    dataset_id: {ORDERS_ID}\n  - id: b\n    dataset_id: {CUSTOMERS_ID}\n---\n"
    );
    let result = validate(&doc(&text), &catalog(), "alice");
    assert!(!result.has_code(IssueCode::NoRelationships));
}

#[test]
fn test_rule_pass() {
    let text = VALID.replace(
        "  - id: positive_amount\n    rule_type: validation\n    severity: error\n    condition: amount > 0\n",
        "  - id: bad_rule\n    rule_type: style\n    severity: critical\n    condition: \"  \"\n  - id: bare_rule\n    condition: amount > 0\n",
    );
    let result = validate(&doc(&text), &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::InvalidSeverity), 2);
    assert_eq!(result.count_code(IssueCode::InvalidRuleType), 2);
    assert_eq!(result.count_code(IssueCode::EmptyRuleCondition), 1);
}

#[test]
fn test_passes_accumulate() {
    let text = r#"---
name: ab
version: 1.0.0
description: short
datasets:
  - id: a
  - id: b
relationships:
  - left_dataset: a
    right_dataset: b
  - left_dataset: b
    right_dataset: a
business_rules:
  - id: r
    severity: error
    rule_type: quality
    condition: ""
---
"#;
    let result = validate(&doc(text), &catalog(), "alice");
    assert!(result.has_code(IssueCode::InvalidName));
    assert!(result.has_code(IssueCode::InvalidDescription));
    assert_eq!(result.count_code(IssueCode::MissingDatasetId), 2);
    assert!(result.has_code(IssueCode::CircularDependency));
    assert!(result.has_code(IssueCode::EmptyRuleCondition));
}
