//! Project a learner's profile onto the concept graph.
//!
//! Profiles key skills and gaps by concept name; matching is case-insensitive.

use std::collections::{HashMap, HashSet};

use perspectra_common::{Concept, MasteryStatus, Profile, StudentConceptNode};

use crate::graph::ConceptGraph;

/// Skill and gap lookups keyed by lower-cased concept name.
pub(crate) struct ProfileIndex {
    skills: HashMap<String, f64>,
    gaps: HashSet<String>,
}

impl ProfileIndex {
    pub(crate) fn new(profile: &Profile) -> Self {
        Self {
            skills: profile
                .skills
                .iter()
                .map(|(name, score)| (name.trim().to_lowercase(), *score))
                .collect(),
            gaps: profile.gaps.iter().map(|g| g.trim().to_lowercase()).collect(),
        }
    }

    pub(crate) fn skill(&self, concept: &Concept) -> Option<f64> {
        self.skills.get(&concept.name.to_lowercase()).copied()
    }

    pub(crate) fn is_gap(&self, concept: &Concept) -> bool {
        self.gaps.contains(&concept.name.to_lowercase())
    }

    pub(crate) fn status(&self, concept: &Concept) -> MasteryStatus {
        MasteryStatus::derive(self.skill(concept), self.is_gap(concept))
    }
}

pub fn student_nodes(graph: &ConceptGraph, profile: &Profile) -> Vec<StudentConceptNode> {
    let index = ProfileIndex::new(profile);
    graph
        .concepts()
        .iter()
        .map(|concept| StudentConceptNode {
            status: index.status(concept),
            skill_level: index.skill(concept).unwrap_or(0.0),
            concept: concept.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_statuses() {
        let g = ConceptGraph::builtin().unwrap();
        let mut p = Profile::new(Uuid::new_v4());
        p.skills.insert("arrays".into(), 0.8);
        p.skills.insert("Strings".into(), 0.4);
        p.skills.insert("Recursion".into(), 0.9);
        p.gaps = vec!["Recursion".into()];

        let nodes = student_nodes(&g, &p);
        let status = |id: &str| nodes.iter().find(|n| n.concept.id == id).map(|n| (n.status, n.skill_level));
        assert_eq!(status("c02"), Some((MasteryStatus::Mastered, 0.8)));
        assert_eq!(status("c03"), Some((MasteryStatus::Learning, 0.4)));
        assert_eq!(status("c10"), Some((MasteryStatus::Gap, 0.9)));
        assert_eq!(status("c22"), Some((MasteryStatus::Untouched, 0.0)));
        assert_eq!(nodes.len(), 30);
    }
}
