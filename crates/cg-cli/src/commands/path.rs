//! Path command implementation

use anyhow::{bail, Result};
use cg_core::{
    find_multi_path, find_path, suggest_joins, ContextDocument, JoinPath, RelationshipGraph,
    ResolverConfig,
};

use crate::cli::{GlobalArgs, OutputFormat, PathArgs};
use crate::commands::common::{
    describe_edge, load_document, load_resolver_config, print_json, ExitCode,
};

/// Execute the path command
pub(crate) fn execute(args: &PathArgs, global: &GlobalArgs) -> Result<()> {
    let doc = load_document(&args.file, global)?;
    let config = load_resolver_config(global)?;
    let datasets = declared_datasets(&doc, &args.datasets)?;
    let graph = RelationshipGraph::build(&doc.relationships);

    if args.suggest {
        let depth = args.max_depth.unwrap_or(config.max_multi_depth);
        let strategies = suggest_joins(&graph, &datasets, depth, config.max_suggestions);
        if strategies.is_empty() {
            eprintln!("No join strategy connects: {}", datasets.join(", "));
            return Err(ExitCode(1).into());
        }

        return match args.output {
            OutputFormat::Json => print_json(&strategies),
            OutputFormat::Text => {
                for (i, strategy) in strategies.iter().enumerate() {
                    println!(
                        "Strategy {}: start at {}, {} join(s), cost {}",
                        i + 1,
                        strategy.start_dataset,
                        strategy.join_count,
                        strategy.cost
                    );
                    print_edges(&strategy.path);
                }
                Ok(())
            }
        };
    }

    let path = resolve(&graph, &datasets, args.max_depth, &config)?;
    if global.verbose {
        eprintln!(
            "[verbose] Resolved {} join(s) over {}",
            path.len(),
            path.datasets().join(", ")
        );
    }

    match args.output {
        OutputFormat::Json => print_json(&path),
        OutputFormat::Text => {
            if path.is_empty() {
                println!("No joins needed");
            } else {
                println!("Join path ({} join(s)):", path.len());
                print_edges(&path);
            }
            Ok(())
        }
    }
}

/// Point-to-point search for two datasets, greedy multi-dataset search otherwise
pub(crate) fn resolve(
    graph: &RelationshipGraph,
    datasets: &[&str],
    max_depth: Option<usize>,
    config: &ResolverConfig,
) -> Result<JoinPath> {
    if let [from, to] = datasets {
        let depth = max_depth.unwrap_or(config.max_path_depth);
        return match find_path(graph, from, to, depth) {
            Some(path) => Ok(path),
            None => bail!("No join path from {} to {} within {} join(s)", from, to, depth),
        };
    }

    let depth = max_depth.unwrap_or(config.max_multi_depth);
    Ok(find_multi_path(graph, datasets, depth)?)
}

/// Requested dataset ids in order with repeats dropped, rejecting ids the
/// document does not declare
pub(crate) fn declared_datasets<'a>(
    doc: &ContextDocument,
    requested: &'a [String],
) -> Result<Vec<&'a str>> {
    let mut datasets: Vec<&str> = Vec::with_capacity(requested.len());
    for id in requested {
        if doc.dataset(id).is_none() {
            let known: Vec<&str> = doc.datasets.iter().map(|d| d.local_id.as_str()).collect();
            bail!(
                "Unknown dataset '{}' (declared: {})",
                id,
                known.join(", ")
            );
        }
        if !datasets.contains(&id.as_str()) {
            datasets.push(id.as_str());
        }
    }
    Ok(datasets)
}

fn print_edges(path: &JoinPath) {
    for (i, edge) in path.iter().enumerate() {
        println!("  {}. {}", i + 1, describe_edge(edge));
    }
}
