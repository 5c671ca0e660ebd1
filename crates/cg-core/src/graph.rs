//! Relationship graph building and cycle detection

use crate::document::Relationship;
use crate::join_path::{JoinPathEdge, TraversalDirection};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Edge weight: which relationship, walked which way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Traversal {
    relationship: usize,
    direction: TraversalDirection,
}

/// Traversable graph over local dataset ids.
///
/// Each relationship contributes a forward and a reverse edge, so path search
/// treats the graph as undirected. Graphs are cheap to build and are meant to
/// be rebuilt per resolution call.
#[derive(Debug)]
pub struct RelationshipGraph {
    graph: DiGraph<String, Traversal>,
    node_map: HashMap<String, NodeIndex>,
    relationships: Vec<Relationship>,
}

impl RelationshipGraph {
    /// Build the graph from relationships in declaration order
    pub fn build(relationships: &[Relationship]) -> Self {
        let mut graph = Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            relationships: relationships.to_vec(),
        };

        for (idx, rel) in relationships.iter().enumerate() {
            let left = graph.add_dataset(&rel.left_dataset);
            let right = graph.add_dataset(&rel.right_dataset);
            graph.graph.add_edge(
                left,
                right,
                Traversal {
                    relationship: idx,
                    direction: TraversalDirection::Forward,
                },
            );
            graph.graph.add_edge(
                right,
                left,
                Traversal {
                    relationship: idx,
                    direction: TraversalDirection::Reverse,
                },
            );
        }

        log::debug!(
            "Built relationship graph: {} datasets, {} relationships",
            graph.graph.node_count(),
            relationships.len()
        );
        graph
    }

    fn add_dataset(&mut self, local_id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(local_id) {
            return idx;
        }
        let idx = self.graph.add_node(local_id.to_string());
        self.node_map.insert(local_id.to_string(), idx);
        idx
    }

    /// Whether any relationship touches the dataset
    pub fn contains(&self, local_id: &str) -> bool {
        self.node_map.contains_key(local_id)
    }

    /// Datasets in first-seen order
    pub fn datasets(&self) -> Vec<&str> {
        self.graph.node_weights().map(String::as_str).collect()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Look up a relationship by id
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// All relationships touching a dataset, in declaration order
    pub fn relationships_for_dataset(&self, local_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.involves(local_id))
            .collect()
    }

    pub(crate) fn node(&self, local_id: &str) -> Option<NodeIndex> {
        self.node_map.get(local_id).copied()
    }

    pub(crate) fn name(&self, node: NodeIndex) -> &str {
        &self.graph[node]
    }

    /// Outgoing traversals from a node, in declaration order.
    ///
    /// petgraph iterates adjacency newest-first; sorting by edge index restores
    /// insertion order so ties in path search resolve deterministically.
    pub(crate) fn traversals(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut out: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges(node)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_by_key(|(edge, _)| *edge);
        out
    }

    /// Materialize the path edge for one graph edge
    pub(crate) fn path_edge(&self, edge: EdgeIndex) -> Option<JoinPathEdge> {
        let traversal = self.graph.edge_weight(edge)?;
        let rel = self.relationships.get(traversal.relationship)?;
        Some(JoinPathEdge::from_relationship(rel, traversal.direction))
    }
}

/// Find the first directed cycle over `left_dataset -> right_dataset` edges.
///
/// Returns the node sequence with the starting node repeated at the end
/// (`[a, b, c, a]`), or `None` when the declared edges are acyclic.
pub fn find_directed_cycle(relationships: &[Relationship]) -> Option<Vec<String>> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
    for rel in relationships {
        let left = *node_map
            .entry(rel.left_dataset.as_str())
            .or_insert_with(|| graph.add_node(rel.left_dataset.as_str()));
        let right = *node_map
            .entry(rel.right_dataset.as_str())
            .or_insert_with(|| graph.add_node(rel.right_dataset.as_str()));
        graph.add_edge(left, right, ());
    }

    if !is_cyclic_directed(&graph) {
        return None;
    }

    let mut visited = HashSet::new();
    let mut stack = Vec::new();
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        if let Some(cycle) = cycle_dfs(&graph, start, &mut visited, &mut stack) {
            return Some(cycle.into_iter().map(|n| graph[n].to_string()).collect());
        }
    }
    None
}

fn cycle_dfs(
    graph: &DiGraph<&str, ()>,
    node: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
    stack: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    visited.insert(node);
    stack.push(node);

    let mut successors: Vec<(EdgeIndex, NodeIndex)> =
        graph.edges(node).map(|e| (e.id(), e.target())).collect();
    successors.sort_by_key(|(edge, _)| *edge);

    for (_, next) in successors {
        if let Some(pos) = stack.iter().position(|&n| n == next) {
            let mut cycle = stack[pos..].to_vec();
            cycle.push(next);
            return Some(cycle);
        }
        if !visited.contains(&next) {
            if let Some(cycle) = cycle_dfs(graph, next, visited, stack) {
                return Some(cycle);
            }
        }
    }

    stack.pop();
    None
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
