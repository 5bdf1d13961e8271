//! In-memory concept graph built from the catalog or the concept repository.

use std::collections::HashMap;

use perspectra_common::{Concept, ConceptEdge};

use crate::error::KgError;

#[derive(Debug, Clone)]
pub struct ConceptGraph {
    concepts: Vec<Concept>,
    edges: Vec<ConceptEdge>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ConceptGraph {
    /// Build a graph. Every edge must reference known concepts.
    pub fn new(concepts: Vec<Concept>, edges: Vec<ConceptEdge>) -> Result<Self, KgError> {
        let by_id: HashMap<String, usize> =
            concepts.iter().enumerate().map(|(i, c)| (c.id.clone(), i)).collect();
        let by_name: HashMap<String, usize> =
            concepts.iter().enumerate().map(|(i, c)| (name_key(&c.name), i)).collect();

        if let Some(bad) = edges
            .iter()
            .find(|e| !by_id.contains_key(&e.source) || !by_id.contains_key(&e.target))
        {
            return Err(KgError::DanglingEdge {
                from: bad.source.clone(),
                to: bad.target.clone(),
            });
        }

        Ok(Self { concepts, edges, by_id, by_name })
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, KgError> {
        Self::new(crate::catalog::concepts(), crate::catalog::edges())
    }

    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    pub fn edges(&self) -> &[ConceptEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.by_id.get(id).map(|&i| &self.concepts[i])
    }

    /// Case-insensitive, whitespace-trimmed name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Concept> {
        self.by_name.get(&name_key(name)).map(|&i| &self.concepts[i])
    }

    /// Concepts `id` directly depends on.
    pub fn prerequisites(&self, id: &str) -> Vec<&Concept> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .filter_map(|e| self.get(&e.target))
            .collect()
    }

    /// Concepts that directly depend on `id`.
    pub fn unlocks(&self, id: &str) -> Vec<&Concept> {
        self.edges
            .iter()
            .filter(|e| e.target == id)
            .filter_map(|e| self.get(&e.source))
            .collect()
    }

    /// Case-insensitive substring match over names. Empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Concept> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.concepts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&q))
            .collect()
    }
}
