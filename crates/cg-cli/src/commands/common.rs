//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cg_core::{CatalogEntry, ContextDocument, JoinPathEdge, ResolverConfig, StaticSchemaLookup};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; never shown to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Read and parse a context document
pub(crate) fn load_document(file: &str, global: &GlobalArgs) -> Result<ContextDocument> {
    let doc = ContextDocument::from_file(Path::new(file), global.default_dataset.as_deref())
        .with_context(|| format!("Failed to load context document: {}", file))?;

    if global.verbose {
        eprintln!(
            "[verbose] Loaded '{}' v{} ({}, {} datasets, {} relationships)",
            doc.name,
            doc.version,
            doc.context_type,
            doc.datasets.len(),
            doc.relationships.len()
        );
    }
    Ok(doc)
}

/// Resolver limits from `--config`, or from the current directory when present
pub(crate) fn load_resolver_config(global: &GlobalArgs) -> Result<ResolverConfig> {
    let config = match &global.config {
        Some(path) => ResolverConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load resolver config: {}", path))?,
        None => ResolverConfig::load_from_dir(Path::new("."))
            .context("Failed to load resolver config")?,
    };

    if global.verbose {
        eprintln!(
            "[verbose] Resolver limits: path depth {}, multi depth {}, suggestions {}",
            config.max_path_depth, config.max_multi_depth, config.max_suggestions
        );
    }
    Ok(config)
}

/// Load a YAML catalog of datasets and their columns
pub(crate) fn load_catalog(path: &str) -> Result<StaticSchemaLookup> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path))?;
    let entries: Vec<CatalogEntry> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path))?;
    Ok(entries.into_iter().collect())
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

/// One-line description of a traversal, e.g. `orders LEFT JOIN customers ON customer_id = id`
pub(crate) fn describe_edge(edge: &JoinPathEdge) -> String {
    let on = if edge.conditions.is_empty() {
        "TRUE".to_string()
    } else {
        edge.conditions
            .iter()
            .map(|c| format!("{} {} {}", c.left_column, c.operator, c.right_column))
            .collect::<Vec<_>>()
            .join(" AND ")
    };
    let reversed = if edge.is_reverse() { " (reversed)" } else { "" };
    format!(
        "{} {} JOIN {} ON {}{}",
        edge.left_dataset,
        edge.join_type.sql_keyword(),
        edge.right_dataset,
        on,
        reversed
    )
}
