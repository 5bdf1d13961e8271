//! Concepts of the DSA knowledge graph.

use serde::{Deserialize, Serialize};

use crate::mastery::MasteryStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub difficulty: u8,
    pub description: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_subject() -> String {
    "DSA".to_string()
}

/// `source` depends on `target`; the target is the prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConceptEdge {
    pub source: String,
    pub target: String,
}

/// A concept annotated with one learner's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentConceptNode {
    #[serde(flatten)]
    pub concept: Concept,
    pub status: MasteryStatus,
    /// Recorded score, or 0.0 when nothing is recorded.
    pub skill_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptGraphView<N> {
    pub nodes: Vec<N>,
    pub edges: Vec<ConceptEdge>,
}
