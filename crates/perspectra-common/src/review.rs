//! Code reviews produced by the reviewer agent.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::profile::ProfileUpdate;

/// Profile deltas suggested by the reviewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewProfileUpdates {
    pub skills: BTreeMap<String, f64>,
    pub gaps: Vec<String>,
    pub strengths: Vec<String>,
    pub mistake_patterns: Vec<String>,
}

/// What the reviewer returns for one submission. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewOutcome {
    /// 0–100.
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub thinking_style: String,
    pub concept_gaps: Vec<String>,
    pub known_concepts: Vec<String>,
    pub topics_to_revise: Vec<String>,
    pub detailed_feedback: String,
    pub profile_updates: ReviewProfileUpdates,
}

impl Default for ReviewOutcome {
    fn default() -> Self {
        Self {
            score: 0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            thinking_style: "brute_force".to_string(),
            concept_gaps: Vec::new(),
            known_concepts: Vec::new(),
            topics_to_revise: Vec::new(),
            detailed_feedback: String::new(),
            profile_updates: ReviewProfileUpdates::default(),
        }
    }
}

impl ReviewOutcome {
    /// Profile change implied by this review, before the submission counter bump.
    pub fn profile_update(&self) -> ProfileUpdate {
        let pu = &self.profile_updates;
        ProfileUpdate {
            skills: pu.skills.clone(),
            gaps: (!pu.gaps.is_empty()).then(|| pu.gaps.clone()),
            strengths: (!pu.strengths.is_empty()).then(|| pu.strengths.clone()),
            mistake_patterns: pu.mistake_patterns.clone(),
            thinking_style: (!self.thinking_style.trim().is_empty())
                .then(|| self.thinking_style.clone()),
            new_weaknesses: self.concept_gaps.clone(),
            add_known_concepts: self.known_concepts.clone(),
            ..Default::default()
        }
    }
}

/// Accepts integers, floats and numeric strings; anything else scores 0.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if !raw.is_finite() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// A persisted review. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: String,
    pub problem_title: String,
    pub code: String,
    pub code_fingerprint: String,
    pub language: String,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Score on the 0–10 scale shown to learners.
    pub fn display_score(&self) -> f64 {
        f64::from(self.outcome.score) / 10.0
    }

    pub fn history_entry(&self) -> ReviewHistoryEntry {
        ReviewHistoryEntry {
            id: self.id,
            problem_id: self.problem_id.clone(),
            problem_title: self.problem_title.clone(),
            language: self.language.clone(),
            outcome: self.outcome.clone(),
            created_at: self.created_at,
        }
    }
}

/// History view of a review, without the submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewHistoryEntry {
    pub id: Uuid,
    pub problem_id: String,
    pub problem_title: String,
    pub language: String,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
    pub created_at: DateTime<Utc>,
}
