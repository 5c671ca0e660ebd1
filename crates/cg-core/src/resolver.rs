//! Join path discovery over a [`RelationshipGraph`]
//!
//! Point-to-point search is a depth-bounded BFS, so the returned path is the
//! shortest by edge count with ties broken by declaration order.
//! Multi-dataset search is a greedy Steiner-tree approximation built from
//! repeated point-to-point searches; it is deterministic but not optimal.

use crate::document::JoinType;
use crate::graph::RelationshipGraph;
use crate::join_path::{JoinPath, JoinPathEdge};
use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// Default edge limit for point-to-point search
pub const DEFAULT_MAX_PATH_DEPTH: usize = 5;

/// Default per-step edge limit for multi-dataset search
pub const DEFAULT_MAX_MULTI_DEPTH: usize = 10;

/// Default number of ranked join strategies
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// Cost of every join on a path
pub const JOIN_BASE_COST: u32 = 10;

/// Added for left, right and outer joins
pub const NON_INNER_SURCHARGE: u32 = 5;

/// Added again for outer joins
pub const OUTER_EXTRA_SURCHARGE: u32 = 5;

/// Maximum number of times one dataset may appear across a path's edges
const MAX_DATASET_APPEARANCES: usize = 2;

/// Required datasets that could not all be joined
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Cannot connect datasets [{}] to [{}]: no join path within the depth limit",
    unreachable.join(", "),
    connected.join(", ")
)]
pub struct DisconnectedDatasets {
    /// Required datasets joined before the search got stuck
    pub connected: Vec<String>,
    /// Required datasets no path could reach
    pub unreachable: Vec<String>,
}

/// One ranked way of joining a set of datasets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinStrategy {
    pub start_dataset: String,
    pub path: JoinPath,
    pub cost: u32,
    pub join_count: usize,
}

/// Shortest path from `from` to `to` using at most `max_depth` edges.
///
/// Returns an empty path when `from == to`, and `None` when either dataset is
/// unknown to the graph or no path fits within the depth limit.
pub fn find_path(
    graph: &RelationshipGraph,
    from: &str,
    to: &str,
    max_depth: usize,
) -> Option<JoinPath> {
    if from == to {
        return Some(JoinPath::new());
    }
    let (start, goal) = (graph.node(from)?, graph.node(to)?);

    let mut parents: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([(start, 0usize)]);

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for (edge, next) in graph.traversals(current) {
            if !visited.insert(next) {
                continue;
            }
            parents.insert(next, (current, edge));
            if next == goal {
                let path = rebuild_path(graph, &parents, start, goal);
                log::debug!("Found path {from} -> {to} with {} join(s)", path.len());
                return Some(path);
            }
            queue.push_back((next, depth + 1));
        }
    }

    log::debug!("No path {from} -> {to} within {max_depth} join(s)");
    None
}

fn rebuild_path(
    graph: &RelationshipGraph,
    parents: &HashMap<NodeIndex, (NodeIndex, EdgeIndex)>,
    start: NodeIndex,
    goal: NodeIndex,
) -> JoinPath {
    let mut edges: Vec<JoinPathEdge> = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(&(prev, edge)) = parents.get(&current) else {
            break;
        };
        edges.extend(graph.path_edge(edge));
        current = prev;
    }
    edges.reverse();
    JoinPath::from_edges(edges)
}

/// Join path connecting every required dataset.
///
/// Starting from the first required dataset, repeatedly picks the shortest
/// path from any connected required dataset to any unconnected one (first
/// found wins on ties), merges its edges and marks the far endpoint
/// connected. Relationships revisited along the way appear once.
pub fn find_multi_path(
    graph: &RelationshipGraph,
    required: &[&str],
    max_depth: usize,
) -> Result<JoinPath, DisconnectedDatasets> {
    let mut remaining: Vec<&str> = Vec::new();
    for ds in required {
        if !remaining.contains(ds) {
            remaining.push(ds);
        }
    }
    if remaining.len() < 2 {
        return Ok(JoinPath::new());
    }

    let mut connected = vec![remaining.remove(0)];
    let mut path = JoinPath::new();

    while !remaining.is_empty() {
        let mut best: Option<(usize, JoinPath)> = None;
        for source in &connected {
            for (target_idx, target) in remaining.iter().enumerate() {
                let Some(candidate) = find_path(graph, source, target, max_depth) else {
                    continue;
                };
                if best.as_ref().is_none_or(|(_, b)| candidate.len() < b.len()) {
                    best = Some((target_idx, candidate));
                }
            }
        }

        let Some((target_idx, best_path)) = best else {
            return Err(DisconnectedDatasets {
                connected: connected.iter().map(|s| s.to_string()).collect(),
                unreachable: remaining.iter().map(|s| s.to_string()).collect(),
            });
        };

        let target = remaining.remove(target_idx);
        log::debug!(
            "Connecting {target} with {} join(s), {} dataset(s) left",
            best_path.len(),
            remaining.len()
        );
        for edge in best_path.iter() {
            path.push(edge.clone());
        }
        connected.push(target);
    }

    Ok(path)
}

/// Datasets reachable from `local_id`, including itself, in BFS order.
///
/// A dataset unknown to the graph reaches only itself.
pub fn connected_datasets(graph: &RelationshipGraph, local_id: &str) -> Vec<String> {
    let Some(start) = graph.node(local_id) else {
        return vec![local_id.to_string()];
    };

    let mut visited = HashSet::from([start]);
    let mut order = vec![start];
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for (_, next) in graph.traversals(current) {
            if visited.insert(next) {
                order.push(next);
                queue.push_back(next);
            }
        }
    }

    order
        .into_iter()
        .map(|n| graph.name(n).to_string())
        .collect()
}

/// A path is degenerate when any dataset appears on more than two edge ends
pub fn is_valid_path(path: &JoinPath) -> bool {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for edge in path {
        *counts.entry(edge.left_dataset.as_str()).or_default() += 1;
        *counts.entry(edge.right_dataset.as_str()).or_default() += 1;
    }
    counts.values().all(|&c| c <= MAX_DATASET_APPEARANCES)
}

/// Heuristic cost used only to rank alternative strategies
pub fn estimate_cost(path: &JoinPath) -> u32 {
    path.iter()
        .map(|edge| {
            let surcharge = match edge.join_type {
                JoinType::Left | JoinType::Right => NON_INNER_SURCHARGE,
                JoinType::Outer => NON_INNER_SURCHARGE + OUTER_EXTRA_SURCHARGE,
                _ => 0,
            };
            JOIN_BASE_COST + surcharge
        })
        .sum()
}

/// Rank join strategies for the required datasets, cheapest first.
///
/// Each required dataset is tried as the starting point of a multi-dataset
/// search. Unconnectable and degenerate results are dropped; equal costs keep
/// the order of their starting datasets.
pub fn suggest_joins(
    graph: &RelationshipGraph,
    required: &[&str],
    max_depth: usize,
    max_suggestions: usize,
) -> Vec<JoinStrategy> {
    let mut strategies = Vec::new();

    for start in required {
        let mut ordered = vec![*start];
        ordered.extend(required.iter().filter(|ds| *ds != start));

        let path = match find_multi_path(graph, &ordered, max_depth) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No strategy starting from {start}: {e}");
                continue;
            }
        };
        if !is_valid_path(&path) {
            log::warn!("Discarding degenerate join path starting from {start}");
            continue;
        }

        strategies.push(JoinStrategy {
            start_dataset: start.to_string(),
            cost: estimate_cost(&path),
            join_count: path.len(),
            path,
        });
    }

    strategies.sort_by_key(|s| s.cost);
    strategies.truncate(max_suggestions);
    strategies
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
