//! Query command implementation

use anyhow::{bail, Context, Result};
use cg_core::{JoinPath, RelationshipGraph};
use cg_sql::{ensure_read_only, ensure_safe, QueryGenerator, QueryOptions};
use std::collections::HashMap;

use crate::cli::{GlobalArgs, QueryArgs};
use crate::commands::common::{load_document, load_resolver_config, ExitCode};
use crate::commands::path::{declared_datasets, resolve};

/// Execute the query command
pub(crate) fn execute(args: &QueryArgs, global: &GlobalArgs) -> Result<()> {
    let doc = load_document(&args.file, global)?;
    let generator = QueryGenerator::new(&doc);

    let mut options = QueryOptions {
        where_clauses: args.where_clauses.clone(),
        group_by: args.group_by.clone(),
        order_by: args.order_by.clone(),
        limit: args.limit,
    };
    for spec in &args.filter {
        let (id, params) = parse_filter_spec(spec)?;
        let condition = generator
            .apply_filter(&id, &params)
            .with_context(|| format!("Unknown filter '{}'", id))?;
        if global.verbose {
            eprintln!("[verbose] Filter {} -> {}", id, condition);
        }
        options.where_clauses.push(condition);
    }

    let datasets = declared_datasets(&doc, &args.datasets)?;
    let sql = match datasets.as_slice() {
        [] => generator.generate_query(&args.select, &JoinPath::new(), &options),
        [single] => generator.generate_dataset_query(single, &args.select, &options),
        _ => {
            let config = load_resolver_config(global)?;
            let graph = RelationshipGraph::build(&doc.relationships);
            let path = resolve(&graph, &datasets, None, &config)?;
            generator.generate_query(&args.select, &path, &options)
        }
    };

    if let Err(e) = ensure_safe(&sql) {
        eprintln!("Refusing to print generated SQL: {}", e);
        return Err(ExitCode(1).into());
    }
    if global.verbose {
        if let Err(e) = ensure_read_only(&sql) {
            eprintln!("[verbose] Generated SQL did not parse as a read query: {}", e);
        }
    }

    println!("{}", sql);
    Ok(())
}

/// Split `id` or `id:name=value,name=value` into a filter id and its parameters
pub(crate) fn parse_filter_spec(spec: &str) -> Result<(String, HashMap<String, String>)> {
    let (id, rest) = match spec.split_once(':') {
        Some((id, rest)) => (id.trim(), rest),
        None => (spec.trim(), ""),
    };
    if id.is_empty() {
        bail!("Filter spec '{}' has no filter id", spec);
    }

    let mut params = HashMap::new();
    for pair in rest.split(',').filter(|p| !p.trim().is_empty()) {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("Filter parameter '{}' must look like name=value", pair.trim());
        };
        params.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok((id.to_string(), params))
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
