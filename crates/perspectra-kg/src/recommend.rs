//! Next-concept recommendation.
//!
//! A concept is a candidate when it is neither mastered nor a listed gap, and
//! every direct prerequisite has some recorded skill. Candidates are ordered by
//! tier, then difficulty, then id. With no candidate, the first profile gap that
//! names a known concept is returned instead.

use perspectra_common::{Concept, MasteryStatus, Profile};
use serde::{Deserialize, Serialize};

use crate::graph::ConceptGraph;
use crate::overlay::ProfileIndex;

pub const DEFAULT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub tier: u8,
    pub difficulty: u8,
}

impl From<&Concept> for Recommendation {
    fn from(c: &Concept) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            tier: c.tier,
            difficulty: c.difficulty,
        }
    }
}

pub fn recommend(graph: &ConceptGraph, profile: &Profile, limit: usize) -> Vec<Recommendation> {
    let index = ProfileIndex::new(profile);

    let mut candidates: Vec<&Concept> = graph
        .concepts()
        .iter()
        .filter(|c| !matches!(index.status(c), MasteryStatus::Mastered | MasteryStatus::Gap))
        .filter(|c| {
            graph
                .prerequisites(&c.id)
                .iter()
                .all(|p| index.skill(p).is_some())
        })
        .collect();

    candidates.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then_with(|| a.difficulty.cmp(&b.difficulty))
            .then_with(|| a.id.cmp(&b.id))
    });

    if candidates.is_empty() {
        return profile
            .gaps
            .first()
            .and_then(|gap| graph.by_name(gap))
            .map(|c| vec![Recommendation::from(c)])
            .unwrap_or_default();
    }

    candidates.into_iter().take(limit).map(Recommendation::from).collect()
}
