//! Parse command implementation

use anyhow::Result;
use cg_core::{ContextDocument, JoinPathEdge, TraversalDirection};

use crate::cli::{GlobalArgs, OutputFormat, ParseArgs};
use crate::commands::common::{describe_edge, load_document, print_json};

/// Execute the parse command
pub(crate) fn execute(args: &ParseArgs, global: &GlobalArgs) -> Result<()> {
    let doc = load_document(&args.file, global)?;

    match args.output {
        OutputFormat::Json => print_json(&doc),
        OutputFormat::Text => {
            print_text(&doc);
            Ok(())
        }
    }
}

fn print_text(doc: &ContextDocument) {
    println!("Context: {} (v{})", doc.name, doc.version);
    println!("Type: {}", doc.context_type);
    println!("Status: {}", doc.status);
    if let Some(owner) = &doc.owner {
        println!("Owner: {}", owner);
    }
    if !doc.tags.is_empty() {
        println!("Tags: {}", doc.tags.join(", "));
    }
    println!("Fingerprint: {} ({} bytes)", doc.content_hash, doc.content_length);

    println!();
    println!("Datasets ({}):", doc.datasets.len());
    for ds in &doc.datasets {
        let alias = ds
            .alias
            .as_deref()
            .map(|a| format!(" [{}]", a))
            .unwrap_or_default();
        println!("  - {}{}: {} -> {}", ds.local_id, alias, ds.display_name, ds.external_id);
    }

    println!();
    println!("Relationships ({}):", doc.relationships.len());
    if doc.relationships.is_empty() {
        println!("  (none)");
    }
    for rel in &doc.relationships {
        let edge = JoinPathEdge::from_relationship(rel, TraversalDirection::Forward);
        println!("  - {}: {}", rel.id, describe_edge(&edge));
    }

    let summary = doc.summary();
    println!();
    println!(
        "Metrics: {}, Filters: {}, Business rules: {}, Glossary terms: {}",
        summary.metrics, summary.filters, summary.business_rules, summary.glossary
    );
}
