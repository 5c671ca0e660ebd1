//! Join path output of the relationship resolver

use crate::document::{JoinCondition, JoinType, Relationship};
use serde::Serialize;

/// Which way a relationship was walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalDirection {
    /// Declared `left -> right`
    Forward,
    /// Walked `right -> left`
    Reverse,
}

/// One relationship traversal, oriented the way it was walked.
///
/// `left_dataset` is always the side already joined and `right_dataset` the
/// side being joined in. Reverse traversals carry swapped conditions and a
/// mirrored join type, so consumers never need to look at `traversal_direction` to emit
/// a correct join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinPathEdge {
    pub relationship_id: String,
    pub left_dataset: String,
    pub right_dataset: String,
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
    pub traversal_direction: TraversalDirection,
}

impl JoinPathEdge {
    pub fn from_relationship(rel: &Relationship, direction: TraversalDirection) -> Self {
        match direction {
            TraversalDirection::Forward => Self {
                relationship_id: rel.id.clone(),
                left_dataset: rel.left_dataset.clone(),
                right_dataset: rel.right_dataset.clone(),
                join_type: rel.join_type.clone(),
                conditions: rel.conditions.clone(),
                traversal_direction: direction,
            },
            TraversalDirection::Reverse => Self {
                relationship_id: rel.id.clone(),
                left_dataset: rel.right_dataset.clone(),
                right_dataset: rel.left_dataset.clone(),
                join_type: rel.join_type.mirrored(),
                conditions: rel.conditions.iter().map(JoinCondition::swapped).collect(),
                traversal_direction: direction,
            },
        }
    }

    pub fn is_reverse(&self) -> bool {
        self.traversal_direction == TraversalDirection::Reverse
    }
}

/// Ordered relationship traversals, unique by relationship id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JoinPath {
    edges: Vec<JoinPathEdge>,
}

impl JoinPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path, keeping only the first traversal of each relationship
    pub fn from_edges(edges: impl IntoIterator<Item = JoinPathEdge>) -> Self {
        let mut path = Self::new();
        for edge in edges {
            path.push(edge);
        }
        path
    }

    /// Append an edge unless its relationship is already on the path.
    ///
    /// Returns whether the edge was added.
    pub fn push(&mut self, edge: JoinPathEdge) -> bool {
        if self.contains_relationship(&edge.relationship_id) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains_relationship(&self, relationship_id: &str) -> bool {
        self.edges.iter().any(|e| e.relationship_id == relationship_id)
    }

    pub fn edges(&self) -> &[JoinPathEdge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinPathEdge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The dataset the path starts from (the root `FROM` table)
    pub fn root_dataset(&self) -> Option<&str> {
        self.edges.first().map(|e| e.left_dataset.as_str())
    }

    /// Every dataset touched by the path, in first-seen order
    pub fn datasets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for edge in &self.edges {
            for ds in [edge.left_dataset.as_str(), edge.right_dataset.as_str()] {
                if !seen.contains(&ds) {
                    seen.push(ds);
                }
            }
        }
        seen
    }

    pub fn relationship_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.relationship_id.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a JoinPath {
    type Item = &'a JoinPathEdge;
    type IntoIter = std::slice::Iter<'a, JoinPathEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
