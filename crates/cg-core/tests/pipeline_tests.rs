//! Integration tests for contextgraph core: parse, validate, resolve

use cg_core::{
    find_multi_path, find_path, suggest_joins, validate, CatalogEntry, ContextDocument,
    ContextType, CoreError, IssueCode, JoinType, RelationshipGraph, ResolverConfig,
    StaticSchemaLookup, TraversalDirection, ValidationStatus,
};
use std::path::Path;

fn load(name: &str) -> ContextDocument {
    ContextDocument::from_file(&Path::new("tests/fixtures").join(name), None).unwrap()
}

fn catalog() -> StaticSchemaLookup {
    let text = std::fs::read_to_string("tests/fixtures/catalog.yml").unwrap();
    let entries: Vec<CatalogEntry> = serde_yaml::from_str(&text).unwrap();
    entries.into_iter().collect()
}

/// The structured fixture parses every section
#[test]
fn test_load_sales_context() {
    let doc = load("sales_context.md");

    assert_eq!(doc.name, "Sales Analytics");
    assert_eq!(doc.version, "1.2.0");
    assert_eq!(doc.context_type, ContextType::MultiDataset);
    assert_eq!(doc.category.as_deref(), Some("sales"));

    let summary = doc.summary();
    assert_eq!(summary.datasets, 3);
    assert_eq!(summary.relationships, 2);
    assert_eq!(summary.metrics, 2);
    assert_eq!(summary.filters, 3);
    assert_eq!(summary.business_rules, 1);
    assert_eq!(summary.glossary, 2);

    let orders = doc.dataset("orders").unwrap();
    assert_eq!(orders.sql_alias(), "o");
    assert_eq!(orders.columns[0].business_name.as_deref(), Some("Order amount"));
    assert_eq!(doc.relationship("orders_customers").unwrap().join_type, JoinType::Left);
    assert!(doc.body.starts_with("# Sales Analytics"));
}

#[test]
fn test_sales_context_validates_against_catalog() {
    let doc = load("sales_context.md");
    let result = validate(&doc, &catalog(), "alice");

    assert_eq!(result.status(), ValidationStatus::Passed);
    assert!(result.passed());
    assert_eq!(result.warning_count(), 0);
}

/// Datasets owned by someone else are reported once each, and column checks are skipped
#[test]
fn test_validation_is_scoped_to_owner() {
    let doc = load("sales_context.md");
    let result = validate(&doc, &catalog(), "bob");

    assert_eq!(result.status(), ValidationStatus::Failed);
    assert_eq!(result.count_code(IssueCode::DatasetNotFound), 3);
    assert!(!result.has_code(IssueCode::ColumnNotFound));
}

#[test]
fn test_validation_reports_missing_join_column() {
    let text = std::fs::read_to_string("tests/fixtures/sales_context.md")
        .unwrap()
        .replace("left_column: product_id", "left_column: sku");
    let doc = ContextDocument::parse(&text, None).unwrap();
    let result = validate(&doc, &catalog(), "alice");

    assert_eq!(result.count_code(IssueCode::ColumnNotFound), 1);
    let issue = result.issues().next().unwrap();
    assert_eq!(issue.message, "Column 'sku' not found in dataset 'orders'");
    assert_eq!(issue.field.as_deref(), Some("relationships"));
}

/// Headerless prose is promoted to a full document
#[test]
fn test_headerless_notes() {
    let doc = load("fleet_notes.md");

    assert_eq!(doc.name, "Fleet Operations");
    assert!(doc.description.starts_with("Trips recorded by the telematics feed"));
    assert_eq!(doc.context_type, ContextType::MultiDataset);
    assert_eq!(
        doc.datasets.iter().map(|d| d.local_id.as_str()).collect::<Vec<_>>(),
        vec!["trips", "drivers", "vehicles"]
    );
    assert_eq!(
        doc.relationships.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        vec!["trips_drivers", "trips_vehicles"]
    );

    let result = validate(&doc, &catalog(), "alice");
    assert_eq!(result.count_code(IssueCode::DatasetNotFound), 3);
}

#[test]
fn test_resolve_across_fixture() {
    let doc = load("sales_context.md");
    let graph = RelationshipGraph::build(&doc.relationships);

    let path = find_path(&graph, "customers", "products", 5).unwrap();
    assert_eq!(path.relationship_ids(), vec!["orders_customers", "orders_products"]);
    assert_eq!(path.edges()[0].traversal_direction, TraversalDirection::Reverse);
    assert_eq!(path.edges()[0].join_type, JoinType::Right);
    assert_eq!(path.datasets(), vec!["customers", "orders", "products"]);

    let multi = find_multi_path(&graph, &["orders", "customers", "products"], 10).unwrap();
    assert_eq!(multi.len(), 2);
    assert_eq!(multi.root_dataset(), Some("orders"));
}

#[test]
fn test_suggest_joins_across_fixture() {
    let doc = load("sales_context.md");
    let graph = RelationshipGraph::build(&doc.relationships);

    let strategies = suggest_joins(&graph, &["customers", "products"], 10, 3);
    assert_eq!(strategies.len(), 2);
    assert_eq!(strategies[0].start_dataset, "customers");
    assert_eq!(strategies[1].start_dataset, "products");
    assert!(strategies.iter().all(|s| s.cost == 25 && s.join_count == 2));
}

#[test]
fn test_unknown_dataset_has_no_path() {
    let doc = load("sales_context.md");
    let graph = RelationshipGraph::build(&doc.relationships);

    assert!(find_path(&graph, "orders", "warehouses", 5).is_none());
    let err = find_multi_path(&graph, &["orders", "warehouses"], 10).unwrap_err();
    assert_eq!(err.connected, vec!["orders"]);
    assert_eq!(err.unreachable, vec!["warehouses"]);
}

/// Writing a document back out and re-reading it keeps its content
#[test]
fn test_serialized_document_reparses() {
    let doc = load("sales_context.md");
    let text = doc.with_version("1.3.0").to_context_text().unwrap();
    let reparsed = ContextDocument::parse(&text, None).unwrap();

    assert_eq!(reparsed.version, "1.3.0");
    assert_eq!(reparsed.datasets, doc.datasets);
    assert_eq!(reparsed.relationships, doc.relationships);
    assert_eq!(reparsed.metrics, doc.metrics);
    assert_eq!(reparsed.filters, doc.filters);
    assert_eq!(reparsed.glossary, doc.glossary);
    assert_eq!(reparsed.body, doc.body);
}

#[test]
fn test_missing_file() {
    let err = ContextDocument::from_file(Path::new("tests/fixtures/nope.md"), None).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_resolver_config_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        ResolverConfig::load_from_dir(dir.path()).unwrap(),
        ResolverConfig::default()
    );

    std::fs::write(
        dir.path().join("contextgraph.yml"),
        "max_path_depth: 3\nmax_suggestions: 5\n",
    )
    .unwrap();
    let config = ResolverConfig::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.max_path_depth, 3);
    assert_eq!(config.max_suggestions, 5);
    assert_eq!(config.max_multi_depth, ResolverConfig::default().max_multi_depth);
}
