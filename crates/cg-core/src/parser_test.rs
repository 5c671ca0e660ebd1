use super::*;

const STRUCTURED: &str = r#"---
name: Customer Orders
version: 2.1.0
description: How orders relate to customers
owner: analytics
tags: [sales, core]
created_at: 2024-03-01T12:30:00Z
datasets:
  - id: orders
    name: Orders
    dataset_id: 11111111-1111-4111-8111-111111111111
  - id: customers
    name: Customers
    dataset_id: 22222222-2222-4222-8222-222222222222
relationships:
  - id: orders_customers
    left_dataset: orders
    right_dataset: customers
    join_type: left
    conditions:
      - left_column: customer_id
        right_column: id
---

# Notes

Orders reference customers by id.
"#;

const HEADERLESS: &str = "# Orders\n\nSome text.\n## Datasets\n- Orders (id: abc)\n- Customers (id: def)\n## Relationships\n- Orders -> Customers via customer_id";

#[test]
fn test_split_structured() {
    let parts = split_document("---\nname: x\n---\nbody\n").unwrap();
    assert_eq!(
        parts,
        DocumentParts::Structured {
            header: "name: x\n",
            body: "body"
        }
    );
}

#[test]
fn test_split_headerless() {
    let parts = split_document("  # Title\n\ntext  ").unwrap();
    assert_eq!(
        parts,
        DocumentParts::Headerless {
            body: "# Title\n\ntext"
        }
    );
}

#[test]
fn test_split_unclosed_header_is_malformed() {
    let err = split_document("---\nname: x\nversion: 1.0.0\n").unwrap_err();
    assert!(matches!(err, CoreError::MalformedHeader { .. }));
}

#[test]
fn test_parse_structured() {
    let doc = parse(STRUCTURED, None).unwrap();
    assert_eq!(doc.name, "Customer Orders");
    assert_eq!(doc.version, "2.1.0");
    assert_eq!(doc.owner.as_deref(), Some("analytics"));
    assert_eq!(doc.tags, vec!["sales", "core"]);
    assert_eq!(doc.datasets.len(), 2);
    assert_eq!(doc.relationships.len(), 1);
    assert_eq!(doc.relationships[0].join_type, JoinType::Left);
    assert_eq!(doc.relationships[0].conditions[0].operator, "=");
    assert_eq!(doc.context_type, ContextType::MultiDataset);
    assert_eq!(doc.status, ContextStatus::Active);
    assert!(doc.body.starts_with("# Notes"));
    assert_eq!(
        doc.created_at.map(|t| t.to_rfc3339()),
        Some("2024-03-01T12:30:00+00:00".to_string())
    );
}

#[test]
fn test_parse_records_fingerprint_of_raw_text() {
    let doc = parse(STRUCTURED, None).unwrap();
    let fp = ContentFingerprint::of(STRUCTURED);
    assert_eq!(doc.content_hash, fp.hash);
    assert_eq!(doc.content_length, STRUCTURED.len());
}

#[test]
fn test_parse_infers_single_dataset() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: Order facts\ndatasets:\n  - id: orders\n    dataset_id: abc\n---\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(doc.context_type, ContextType::SingleDataset);
    assert_eq!(doc.datasets[0].display_name, "orders");
}

#[test]
fn test_explicit_context_type_wins() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: Order facts\ncontext_type: multi_dataset\ndatasets:\n  - id: orders\n    dataset_id: abc\n---\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(doc.context_type, ContextType::MultiDataset);
}

#[test]
fn test_unrecognized_context_type_survives_parse() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: Order facts\ncontext_type: star_schema\ndatasets:\n  - id: orders\n---\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(
        doc.context_type,
        ContextType::Unrecognized("star_schema".to_string())
    );
}

#[test]
fn test_missing_required_fields_listed_together() {
    let text = "---\nname: Orders\ndatasets:\n  - name: no id\n---\n";
    let err = parse(text, None).unwrap_err();
    match err {
        CoreError::MissingRequiredField { fields } => {
            assert_eq!(fields, vec!["version", "description", "datasets[0].id"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_nested_fields() {
    let text = r#"---
name: Orders
version: 1.0.0
description: d
datasets:
  - id: orders
relationships:
  - right_dataset: customers
metrics:
  - id: revenue
filters:
  - condition: "x > 1"
glossary:
  - definition: nothing
---
"#;
    let err = parse(text, None).unwrap_err();
    let CoreError::MissingRequiredField { fields } = err else {
        panic!("expected MissingRequiredField");
    };
    assert_eq!(
        fields,
        vec![
            "relationships[0].left_dataset",
            "metrics[0].expression",
            "filters[0].id",
            "glossary[0].term",
        ]
    );
}

#[test]
fn test_invalid_version_format() {
    let text = "---\nname: Orders\nversion: v1\ndescription: d\ndatasets:\n  - id: orders\n---\n";
    let err = parse(text, None).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidVersionFormat { ref version } if version == "v1"
    ));
}

#[test]
fn test_numeric_version_is_rejected_not_missing() {
    let text = "---\nname: Orders\nversion: 1.0\ndescription: d\ndatasets:\n  - id: orders\n---\n";
    let err = parse(text, None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidVersionFormat { .. }));
}

#[test]
fn test_header_not_a_mapping() {
    let err = parse("---\n- a\n- b\n---\nbody", None).unwrap_err();
    assert!(matches!(err, CoreError::MalformedHeader { .. }));
}

#[test]
fn test_header_invalid_yaml() {
    let err = parse("---\nname: [unclosed\n---\nbody", None).unwrap_err();
    assert!(matches!(err, CoreError::MalformedHeader { .. }));
}

#[test]
fn test_empty_dataset_list() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: d\ndatasets: []\n---\n";
    let err = parse(text, None).unwrap_err();
    assert!(matches!(err, CoreError::NoDatasetsFound));
}

#[test]
fn test_relationship_shorthand() {
    let text = r#"---
name: Orders
version: 1.0.0
description: d
datasets:
  - id: orders
  - id: customers
relationships:
  - from_dataset: orders
    to_dataset: customers
    from_column: customer_id
    to_column: id
---
"#;
    let doc = parse(text, None).unwrap();
    let rel = &doc.relationships[0];
    assert_eq!(rel.id, "orders_customers");
    assert_eq!(rel.left_dataset, "orders");
    assert_eq!(rel.right_dataset, "customers");
    assert_eq!(rel.join_type, JoinType::Inner);
    assert_eq!(rel.conditions.len(), 1);
    assert_eq!(rel.conditions[0].left_column, "customer_id");
    assert_eq!(rel.conditions[0].right_column, "id");
}

#[test]
fn test_headerless_lists() {
    let doc = parse(HEADERLESS, None).unwrap();
    assert_eq!(doc.name, "Orders");
    assert_eq!(doc.version, DEFAULT_VERSION);
    assert_eq!(doc.datasets.len(), 2);
    assert_eq!(doc.datasets[0].local_id, "orders");
    assert_eq!(doc.datasets[0].external_id, "abc");
    assert_eq!(doc.datasets[1].local_id, "customers");
    assert_eq!(doc.datasets[1].external_id, "def");
    assert_eq!(doc.relationships.len(), 1);
    assert_eq!(doc.relationships[0].left_dataset, "orders");
    assert_eq!(doc.relationships[0].right_dataset, "customers");
    assert_eq!(doc.relationships[0].id, "orders_customers");
    assert_eq!(
        doc.relationships[0].conditions,
        vec![JoinCondition::same_column("customer_id")]
    );
    assert_eq!(doc.context_type, ContextType::MultiDataset);
}

#[test]
fn test_headerless_dataset_headings() {
    let text = "# Fleet\n\nVehicles and trips.\n\n## Dataset: Vehicle Registry (id: veh-001)\n\nOne row per vehicle.\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(doc.datasets.len(), 1);
    assert_eq!(doc.datasets[0].local_id, "vehicle_registry");
    assert_eq!(doc.datasets[0].display_name, "Vehicle Registry");
    assert_eq!(doc.datasets[0].external_id, "veh-001");
    assert_eq!(doc.description, "Vehicles and trips.");
    assert_eq!(doc.context_type, ContextType::SingleDataset);
}

#[test]
fn test_headerless_unicode_arrow() {
    let text = "## Datasets\n- Trips (id: t1)\n- Drivers (id: d1)\n\n## Relationships\n- Trips → Drivers via driver_id\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(doc.name, "Dataset Context");
    assert_eq!(doc.relationships[0].left_dataset, "trips");
    assert_eq!(doc.relationships[0].right_dataset, "drivers");
}

#[test]
fn test_headerless_default_dataset() {
    let text = "# Orders\n\nJust prose about orders.";
    let doc = parse(text, Some("ext-42")).unwrap();
    assert_eq!(doc.datasets.len(), 1);
    assert_eq!(doc.datasets[0].local_id, "main");
    assert_eq!(doc.datasets[0].external_id, "ext-42");
    assert_eq!(doc.context_type, ContextType::SingleDataset);
}

#[test]
fn test_headerless_without_datasets_fails() {
    let err = parse("# Orders\n\nJust prose.", None).unwrap_err();
    assert!(matches!(err, CoreError::NoDatasetsFound));
}

#[test]
fn test_headerless_description_truncated() {
    let long = "x".repeat(500);
    let text = format!("# T\n\n{long}");
    let doc = parse(&text, Some("ext")).unwrap();
    assert_eq!(doc.description.chars().count(), 200);
}

#[test]
fn test_unparseable_timestamp_is_dropped() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: d\nupdated_at: last tuesday\ndatasets:\n  - id: orders\n---\n";
    let doc = parse(text, None).unwrap();
    assert!(doc.updated_at.is_none());
}

#[test]
fn test_date_only_timestamp() {
    let text = "---\nname: Orders\nversion: 1.0.0\ndescription: d\ncreated_at: 2024-01-15\ndatasets:\n  - id: orders\n---\n";
    let doc = parse(text, None).unwrap();
    assert_eq!(
        doc.created_at.map(|t| t.to_rfc3339()),
        Some("2024-01-15T00:00:00+00:00".to_string())
    );
}

#[test]
fn test_is_semantic_version() {
    assert!(is_semantic_version("1.0.0"));
    assert!(is_semantic_version("10.20.30"));
    assert!(!is_semantic_version("1.0"));
    assert!(!is_semantic_version("1.0.0-beta"));
    assert!(!is_semantic_version("v1.0.0"));
}

#[test]
fn test_from_file_missing_path() {
    let err = ContextDocument::from_file(std::path::Path::new("/nonexistent/ctx.md"), None)
        .unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
    assert!(!err.is_parse_error());
}
