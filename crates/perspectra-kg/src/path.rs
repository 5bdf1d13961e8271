//! Shortest learning path between two concepts.
//!
//! Dependency edges are walked in both directions, so a path exists between any
//! two concepts in the same connected component. Neighbours are visited in id
//! order, which makes the chosen path deterministic among equal-length ones.

use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::graph::ConceptGraph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: String,
    pub name: String,
    pub tier: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub path: Vec<PathNode>,
    pub hops: usize,
}

/// `None` when either name is unknown or the concepts are not connected.
pub fn shortest_path(graph: &ConceptGraph, from_name: &str, to_name: &str) -> Option<LearningPath> {
    let from = graph.by_name(from_name)?;
    let to = graph.by_name(to_name)?;

    let mut adjacency: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for e in graph.edges() {
        adjacency.entry(e.source.as_str()).or_default().insert(e.target.as_str());
        adjacency.entry(e.target.as_str()).or_default().insert(e.source.as_str());
    }

    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::from([from.id.as_str()]);
    parent.insert(from.id.as_str(), from.id.as_str());

    while let Some(current) = queue.pop_front() {
        if current == to.id {
            break;
        }
        for &next in adjacency.get(current).into_iter().flatten() {
            if !parent.contains_key(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    if !parent.contains_key(to.id.as_str()) {
        return None;
    }

    let mut ids = vec![to.id.as_str()];
    let mut cursor = to.id.as_str();
    while cursor != from.id {
        cursor = parent[cursor];
        ids.push(cursor);
    }
    ids.reverse();

    let path: Vec<PathNode> = ids
        .into_iter()
        .filter_map(|id| graph.get(id))
        .map(|c| PathNode { id: c.id.clone(), name: c.name.clone(), tier: c.tier })
        .collect();
    let hops = path.len().saturating_sub(1);
    Some(LearningPath { path, hops })
}
