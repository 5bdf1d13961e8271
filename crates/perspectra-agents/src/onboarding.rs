//! Onboarding: five fixed questions, answers turned into an initial profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use perspectra_common::{ExperienceLevel, LearningStyle, ProfileUpdate};

use crate::error::AgentError;
use crate::Agents;

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1200;

pub const ONBOARDING_QUESTIONS: [&str; 5] = [
    "What is your current experience level with programming? (Beginner / Intermediate / Advanced)",
    "Which DSA topics have you studied before? List all you remember.",
    "Which topics do you find most challenging or confusing?",
    "What is your main goal? (e.g., crack coding interviews, learn CS fundamentals, competitive programming)",
    "Tell us anything else about yourself — your background, what you've tried before, or what you expect from Perspectra.",
];

/// What the onboarding analyst infers. Missing keys take beginner defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingInference {
    pub experience_level: ExperienceLevel,
    pub skill_level: Option<ExperienceLevel>,
    pub preferred_style: LearningStyle,
    pub background: String,
    pub goal: String,
    pub initial_skills: BTreeMap<String, f64>,
    pub initial_gaps: Vec<String>,
    pub initial_strengths: Vec<String>,
    pub known_concepts: Vec<String>,
}

impl OnboardingInference {
    /// Profile change for a completed onboarding. Agent-maintained state starts over.
    pub fn into_update(self, answers: BTreeMap<String, String>) -> ProfileUpdate {
        ProfileUpdate {
            onboarding_complete: Some(true),
            onboarding_answers: Some(answers),
            skill_level: Some(self.skill_level.unwrap_or(self.experience_level)),
            experience_level: Some(self.experience_level),
            preferred_style: Some(self.preferred_style),
            background: Some(self.background),
            goal: Some(self.goal),
            skills: self.initial_skills,
            gaps: Some(self.initial_gaps),
            strengths: Some(self.initial_strengths),
            known_concepts: Some(self.known_concepts),
            reset_agent_state: true,
            ..Default::default()
        }
    }
}

/// Pair answers with questions. Answers are taken in key order; any beyond
/// the fifth are labelled as extra notes.
pub fn answers_prompt(answers: &BTreeMap<String, String>) -> String {
    let mut out = String::from("Student onboarding answers:\n");
    for (i, answer) in answers.values().enumerate() {
        match ONBOARDING_QUESTIONS.get(i) {
            Some(q) => out.push_str(&format!("Q{n}: {q}\nA{n}: {}\n", answer.trim(), n = i + 1)),
            None => out.push_str(&format!("Additional note: {}\n", answer.trim())),
        }
    }
    out.push_str("\nAnalyse and return the JSON profile inference.");
    out
}

impl Agents {
    pub async fn infer_onboarding(
        &self,
        answers: &BTreeMap<String, String>,
    ) -> Result<OnboardingInference, AgentError> {
        let system = self.prompts.load("onboarding")?;
        let prompt = answers_prompt(answers);
        let value = self.llm.complete_json(&system, &prompt, TEMPERATURE, MAX_TOKENS).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::agents_with;
    use perspectra_common::Profile;
    use perspectra_llm::ScriptedBackend;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn answers() -> BTreeMap<String, String> {
        [("q1", "Intermediate"), ("q2", "arrays, stacks"), ("q3", "DP"), ("q4", "interviews"), ("q5", "CS student")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_answers_paired_with_questions_in_order() {
        let prompt = answers_prompt(&answers());
        assert!(prompt.contains(&format!("Q1: {}\nA1: Intermediate", ONBOARDING_QUESTIONS[0])));
        assert!(prompt.contains("A3: DP"));
        assert!(prompt.contains("A5: CS student"));
    }

    #[test]
    fn test_extra_answers_are_labelled() {
        let mut a = answers();
        a.insert("q6".into(), "likes graphs".into());
        assert!(answers_prompt(&a).contains("Additional note: likes graphs"));
    }

    #[tokio::test]
    async fn test_inference_resets_agent_state() {
        let backend = Arc::new(ScriptedBackend::new("onboarding"));
        backend.push_json(json!({
            "experience_level": "Intermediate",
            "preferred_style": "example-based",
            "initial_skills": {"Arrays": 0.5},
            "initial_gaps": ["Dynamic Programming"],
            "known_concepts": ["Arrays", "Stacks"]
        }));
        let agents = agents_with(backend);

        let inference = agents.infer_onboarding(&answers()).await.unwrap();
        let mut profile = Profile::default();
        profile.submissions_count = 7;
        profile.mistake_patterns = vec!["off-by-one".into()];
        profile.apply(inference.into_update(answers()));

        assert!(profile.onboarding_complete);
        assert_eq!(profile.experience_level, ExperienceLevel::Intermediate);
        assert_eq!(profile.skill_level(), ExperienceLevel::Intermediate);
        assert_eq!(profile.preferred_style, LearningStyle::ExampleBased);
        assert_eq!(profile.gaps, vec!["Dynamic Programming".to_string()]);
        assert_eq!(profile.skill("Arrays"), Some(0.5));
        assert_eq!(profile.submissions_count, 0);
        assert!(profile.mistake_patterns.is_empty());
        assert_eq!(profile.thinking_style, "unknown");
        assert_eq!(profile.onboarding_answers.len(), 5);
    }
}
