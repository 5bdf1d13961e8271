//! Background summariser: turns recent reviews into learning insights.

use chrono::Utc;

use perspectra_common::{LearningInsights, Profile, Review};

use crate::error::AgentError;
use crate::{list_or, Agents};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1200;

/// True when the submission just counted lands on a summary boundary.
pub fn should_summarize(submissions_count: u32, every: u32) -> bool {
    every > 0 && submissions_count > 0 && submissions_count % every == 0
}

/// `reviews` newest first, as returned by the review repository.
pub fn insights_prompt(profile: &Profile, reviews: &[Review]) -> String {
    let skills = if profile.skills.is_empty() {
        "none recorded".to_string()
    } else {
        profile
            .skills
            .iter()
            .map(|(k, v)| format!("{k}: {v:.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let reviews_block = reviews
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let o = &r.outcome;
            format!(
                "=== Review {} ({}, score {}/100) ===\n\
                 Strengths: {}\n\
                 Gaps: {}\n\
                 Weaknesses: {}\n\
                 Mistake patterns: {}",
                i + 1,
                r.problem_title,
                o.score,
                list_or(&o.strengths, "none"),
                list_or(&o.concept_gaps, "none"),
                list_or(&o.weaknesses, "none"),
                list_or(&o.profile_updates.mistake_patterns, "none"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "## STUDENT PROFILE\n\
         Level: {}\n\
         Skills: {skills}\n\
         Gaps: {}\n\
         Total submissions: {}\n\n\
         ## LAST REVIEWS\n\
         {reviews_block}\n\n\
         Generate the learning insights JSON.",
        profile.experience_level,
        list_or(&profile.gaps, "none"),
        profile.submissions_count,
    )
}

impl Agents {
    /// Summarise recent reviews. Returns `None` when there is nothing to summarise.
    pub async fn summarize(
        &self,
        profile: &Profile,
        reviews: &[Review],
    ) -> Result<Option<LearningInsights>, AgentError> {
        if reviews.is_empty() {
            return Ok(None);
        }
        let system = self.prompts.load("background")?;
        let prompt = insights_prompt(profile, reviews);
        let value = self.llm.complete_json(&system, &prompt, TEMPERATURE, MAX_TOKENS).await?;
        let mut insights: LearningInsights = serde_json::from_value(value)?;
        insights.generated_at = Some(Utc::now());
        Ok(Some(insights))
    }
}
