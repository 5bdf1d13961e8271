//! Dynamic learner profile and its merge rules.
//!
//! A profile is replaced wholesale on read, but every write goes through
//! [`Profile::apply`] so that list fields keep their bounded, de-duplicated shape
//! no matter which agent produced the update.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mastery::MasteryStatus;

pub const HINT_HISTORY_LIMIT: usize = 20;
pub const MISTAKE_PATTERN_LIMIT: usize = 20;
pub const RECENT_WEAKNESS_LIMIT: usize = 10;

// ── Levels & styles ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

/// Lenient: LLM output and user edits arrive in any casing or phrasing.
impl From<String> for ExperienceLevel {
    fn from(raw: String) -> Self {
        let s = raw.to_lowercase();
        if s.contains("adv") || s.contains("expert") {
            ExperienceLevel::Advanced
        } else if s.contains("inter") {
            ExperienceLevel::Intermediate
        } else {
            ExperienceLevel::Beginner
        }
    }
}

impl From<ExperienceLevel> for String {
    fn from(level: ExperienceLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LearningStyle {
    #[default]
    Visual,
    Verbal,
    ExampleBased,
    Conceptual,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "visual",
            LearningStyle::Verbal => "verbal",
            LearningStyle::ExampleBased => "example-based",
            LearningStyle::Conceptual => "conceptual",
        }
    }
}

impl From<String> for LearningStyle {
    fn from(raw: String) -> Self {
        let s = raw.to_lowercase();
        if s.contains("example") {
            LearningStyle::ExampleBased
        } else if s.contains("verbal") {
            LearningStyle::Verbal
        } else if s.contains("concept") {
            LearningStyle::Conceptual
        } else {
            LearningStyle::Visual
        }
    }
}

impl From<LearningStyle> for String {
    fn from(style: LearningStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pace inferred from how many solutions a learner has submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningVelocity {
    Slow,
    Normal,
    Fast,
}

impl LearningVelocity {
    pub fn from_submissions(count: u32) -> Self {
        match count {
            0..=4 => LearningVelocity::Slow,
            5..=19 => LearningVelocity::Normal,
            _ => LearningVelocity::Fast,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            LearningVelocity::Slow => "slow (early stage)",
            LearningVelocity::Normal => "normal",
            LearningVelocity::Fast => "fast (experienced user)",
        }
    }
}

// ── Insights ──────────────────────────────────────────────────────────────────

/// Periodic summary produced by the background agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningInsights {
    pub summary: String,
    pub improving: Vec<String>,
    pub struggling: Vec<String>,
    pub recurring_mistakes: Vec<String>,
    pub recommended_focus: Vec<String>,
    pub next_steps: Vec<String>,
    pub encouragement: String,
    pub generated_at: Option<DateTime<Utc>>,
}

// ── Profile ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub user_id: Uuid,
    pub onboarding_complete: bool,
    pub onboarding_answers: BTreeMap<String, String>,
    pub experience_level: ExperienceLevel,
    pub skill_level: Option<ExperienceLevel>,
    pub preferred_style: LearningStyle,
    pub background: String,
    pub goal: String,
    pub thinking_style: String,
    /// Concept name → mastery score in [0, 1].
    pub skills: BTreeMap<String, f64>,
    pub gaps: Vec<String>,
    pub strengths: Vec<String>,
    pub known_concepts: Vec<String>,
    pub mistake_patterns: Vec<String>,
    pub recent_weaknesses: Vec<String>,
    pub recent_hints: Vec<String>,
    pub submissions_count: u32,
    /// Submission count at the last background summary.
    pub last_summarized_at: u32,
    pub insights: Option<LearningInsights>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(Uuid::nil())
    }
}

impl Profile {
    /// Blank profile created at registration.
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            onboarding_complete: false,
            onboarding_answers: BTreeMap::new(),
            experience_level: ExperienceLevel::Beginner,
            skill_level: None,
            preferred_style: LearningStyle::Visual,
            background: String::new(),
            goal: String::new(),
            thinking_style: "unknown".to_string(),
            skills: BTreeMap::new(),
            gaps: Vec::new(),
            strengths: Vec::new(),
            known_concepts: Vec::new(),
            mistake_patterns: Vec::new(),
            recent_weaknesses: Vec::new(),
            recent_hints: Vec::new(),
            submissions_count: 0,
            last_summarized_at: 0,
            insights: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn skill_level(&self) -> ExperienceLevel {
        self.skill_level.unwrap_or(self.experience_level)
    }

    pub fn velocity(&self) -> LearningVelocity {
        LearningVelocity::from_submissions(self.submissions_count)
    }

    pub fn skill(&self, concept_name: &str) -> Option<f64> {
        self.skills.get(concept_name).copied()
    }

    pub fn has_gap(&self, concept_name: &str) -> bool {
        self.gaps.iter().any(|g| g == concept_name)
    }

    pub fn mastery_of(&self, concept_name: &str) -> MasteryStatus {
        MasteryStatus::derive(self.skill(concept_name), self.has_gap(concept_name))
    }

    /// Highest-scoring skills first; ties broken by name.
    pub fn top_skills(&self, n: usize) -> Vec<(&str, f64)> {
        let mut skills: Vec<(&str, f64)> =
            self.skills.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        skills.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        skills.truncate(n);
        skills
    }

    /// Merge an update into the profile.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if update.reset_agent_state {
            self.thinking_style = "unknown".to_string();
            self.mistake_patterns.clear();
            self.recent_weaknesses.clear();
            self.recent_hints.clear();
            self.submissions_count = 0;
        }

        if let Some(v) = update.onboarding_complete { self.onboarding_complete = v; }
        if let Some(v) = update.onboarding_answers { self.onboarding_answers = v; }
        if let Some(v) = update.experience_level { self.experience_level = v; }
        if let Some(v) = update.skill_level { self.skill_level = Some(v); }
        if let Some(v) = update.preferred_style { self.preferred_style = v; }
        if let Some(v) = update.background { self.background = v; }
        if let Some(v) = update.goal { self.goal = v; }
        if let Some(v) = update.thinking_style {
            if !v.trim().is_empty() {
                self.thinking_style = v;
            }
        }
        if let Some(v) = update.submissions_count { self.submissions_count = v; }
        if let Some(v) = update.last_summarized_at { self.last_summarized_at = v; }
        if let Some(v) = update.insights { self.insights = Some(v); }

        for (concept, score) in update.skills {
            if score.is_finite() {
                self.skills.insert(concept, round2(score.clamp(0.0, 1.0)));
            }
        }

        if let Some(gaps) = update.gaps { self.gaps = dedupe(gaps); }
        if let Some(strengths) = update.strengths { self.strengths = dedupe(strengths); }
        if let Some(known) = update.known_concepts { self.known_concepts = dedupe(known); }

        if !update.add_known_concepts.is_empty() {
            let mut merged = std::mem::take(&mut self.known_concepts);
            merged.extend(update.add_known_concepts);
            self.known_concepts = dedupe(merged);
        }

        if !update.mistake_patterns.is_empty() {
            let mut merged = std::mem::take(&mut self.mistake_patterns);
            merged.extend(update.mistake_patterns);
            self.mistake_patterns = keep_last(dedupe(merged), MISTAKE_PATTERN_LIMIT);
        }

        if !update.new_weaknesses.is_empty() {
            let mut merged = dedupe(update.new_weaknesses);
            for w in std::mem::take(&mut self.recent_weaknesses) {
                if !merged.contains(&w) {
                    merged.push(w);
                }
            }
            merged.truncate(RECENT_WEAKNESS_LIMIT);
            self.recent_weaknesses = merged;
        }

        if let Some(hint) = update.hint {
            self.recent_hints.push(hint);
            self.recent_hints = keep_last(std::mem::take(&mut self.recent_hints), HINT_HISTORY_LIMIT);
        }

        self.updated_at = Utc::now();
    }
}

/// Partial profile change. Absent fields leave the profile untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub onboarding_complete: Option<bool>,
    pub onboarding_answers: Option<BTreeMap<String, String>>,
    pub experience_level: Option<ExperienceLevel>,
    pub skill_level: Option<ExperienceLevel>,
    pub preferred_style: Option<LearningStyle>,
    pub background: Option<String>,
    pub goal: Option<String>,
    pub thinking_style: Option<String>,
    /// Merged per concept.
    pub skills: BTreeMap<String, f64>,
    /// Replaces the gap list.
    pub gaps: Option<Vec<String>>,
    /// Replaces the strength list.
    pub strengths: Option<Vec<String>>,
    /// Replaces the known-concept list.
    pub known_concepts: Option<Vec<String>>,
    /// Added to the known-concept list.
    pub add_known_concepts: Vec<String>,
    /// Appended to the mistake history.
    pub mistake_patterns: Vec<String>,
    /// Put in front of the recent-weakness list.
    pub new_weaknesses: Vec<String>,
    pub hint: Option<String>,
    pub submissions_count: Option<u32>,
    pub last_summarized_at: Option<u32>,
    pub insights: Option<LearningInsights>,
    /// Clear agent-derived history before applying (onboarding).
    pub reset_agent_state: bool,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Drop blanks and repeats, keeping first occurrences in order.
fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().to_string();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn keep_last(mut items: Vec<String>, limit: usize) -> Vec<String> {
    if items.len() > limit {
        items.drain(..items.len() - limit);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skills_merge_clamped_and_rounded() {
        let mut p = Profile::new(Uuid::new_v4());
        p.skills.insert("Arrays".into(), 0.4);
        p.skills.insert("Strings".into(), 0.9);

        let mut update = ProfileUpdate::default();
        update.skills.insert("Arrays".into(), 0.666);
        update.skills.insert("Recursion".into(), 1.7);
        update.skills.insert("Graphs".into(), f64::NAN);
        p.apply(update);

        assert_eq!(p.skill("Arrays"), Some(0.67));
        assert_eq!(p.skill("Strings"), Some(0.9));
        assert_eq!(p.skill("Recursion"), Some(1.0));
        assert_eq!(p.skill("Graphs"), None);
    }

    #[test]
    fn test_mistake_patterns_append_unique_and_bounded() {
        let mut p = Profile::new(Uuid::new_v4());
        p.mistake_patterns = strings(&["off-by-one", "missing base case"]);
        p.apply(ProfileUpdate {
            mistake_patterns: strings(&["missing base case", "overflow"]),
            ..Default::default()
        });
        assert_eq!(p.mistake_patterns, strings(&["off-by-one", "missing base case", "overflow"]));

        let many: Vec<String> = (0..30).map(|i| format!("m{i}")).collect();
        p.apply(ProfileUpdate { mistake_patterns: many, ..Default::default() });
        assert_eq!(p.mistake_patterns.len(), MISTAKE_PATTERN_LIMIT);
        assert_eq!(p.mistake_patterns.last().unwrap(), "m29");
    }

    #[test]
    fn test_recent_weaknesses_newest_first() {
        let mut p = Profile::new(Uuid::new_v4());
        p.recent_weaknesses = strings(&["Recursion", "Graphs"]);
        p.apply(ProfileUpdate {
            new_weaknesses: strings(&["Graphs", "Tries"]),
            ..Default::default()
        });
        assert_eq!(p.recent_weaknesses, strings(&["Graphs", "Tries", "Recursion"]));
    }

    #[test]
    fn test_hints_keep_last_twenty() {
        let mut p = Profile::new(Uuid::new_v4());
        for i in 0..25 {
            p.apply(ProfileUpdate { hint: Some(format!("hint {i}")), ..Default::default() });
        }
        assert_eq!(p.recent_hints.len(), HINT_HISTORY_LIMIT);
        assert_eq!(p.recent_hints[0], "hint 5");
    }

    #[test]
    fn test_known_concepts_union_vs_replace() {
        let mut p = Profile::new(Uuid::new_v4());
        p.apply(ProfileUpdate { known_concepts: Some(strings(&["Arrays"])), ..Default::default() });
        p.apply(ProfileUpdate { add_known_concepts: strings(&["Stacks", "Arrays"]), ..Default::default() });
        assert_eq!(p.known_concepts, strings(&["Arrays", "Stacks"]));
    }

    #[test]
    fn test_reset_agent_state() {
        let mut p = Profile::new(Uuid::new_v4());
        p.submissions_count = 7;
        p.recent_hints = strings(&["h"]);
        p.thinking_style = "greedy".into();
        p.apply(ProfileUpdate { reset_agent_state: true, ..Default::default() });
        assert_eq!(p.submissions_count, 0);
        assert!(p.recent_hints.is_empty());
        assert_eq!(p.thinking_style, "unknown");
    }

    #[test]
    fn test_lenient_level_and_style_parsing() {
        let p: Profile = serde_json::from_value(serde_json::json!({
            "experience_level": "Intermediate",
            "preferred_style": "Example-Based learning",
        }))
        .unwrap();
        assert_eq!(p.experience_level, ExperienceLevel::Intermediate);
        assert_eq!(p.preferred_style, LearningStyle::ExampleBased);
        assert_eq!(serde_json::to_value(p.preferred_style).unwrap(), "example-based");
    }

    #[test]
    fn test_top_skills_ordering() {
        let mut p = Profile::new(Uuid::new_v4());
        p.skills.insert("B".into(), 0.5);
        p.skills.insert("A".into(), 0.5);
        p.skills.insert("C".into(), 0.9);
        let top: Vec<&str> = p.top_skills(2).into_iter().map(|(k, _)| k).collect();
        assert_eq!(top, vec!["C", "A"]);
    }

    #[test]
    fn test_velocity_bands() {
        assert_eq!(LearningVelocity::from_submissions(4), LearningVelocity::Slow);
        assert_eq!(LearningVelocity::from_submissions(5), LearningVelocity::Normal);
        assert_eq!(LearningVelocity::from_submissions(20), LearningVelocity::Fast);
    }
}
