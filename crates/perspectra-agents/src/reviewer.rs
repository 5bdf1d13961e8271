//! Reviewer agent: scores a submission and proposes profile updates.

use perspectra_common::{Problem, Profile, ReviewOutcome};

use crate::error::AgentError;
use crate::{list_or, text_or, Agents};

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 3000;
const TOP_SKILLS: usize = 8;

/// Personalisation block handed to the reviewer.
pub fn personalisation(profile: &Profile) -> String {
    let top = profile.top_skills(TOP_SKILLS);
    let skills = if top.is_empty() {
        "none recorded".to_string()
    } else {
        top.iter()
            .map(|(name, score)| format!("{name}: {score:.2}"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "STUDENT PROFILE\n\
         - Experience level: {experience}\n\
         - Skill level: {skill}\n\
         - Learning velocity: {velocity} ({count} submissions)\n\
         - Preferred style: {style}\n\
         - Background: {background}\n\
         - Goal: {goal}\n\
         - Thinking style so far: {thinking}\n\
         - Strengths: {strengths}\n\
         - Known gaps: {gaps}\n\
         - Recurring mistakes: {mistakes}\n\
         - Recent weaknesses: {weaknesses}\n\
         - Known concepts: {known}\n\
         - Top skills: {skills}",
        experience = profile.experience_level,
        skill = profile.skill_level(),
        velocity = profile.velocity().describe(),
        count = profile.submissions_count,
        style = profile.preferred_style,
        background = text_or(&profile.background, "not given"),
        goal = text_or(&profile.goal, "not given"),
        thinking = profile.thinking_style,
        strengths = list_or(&profile.strengths, "none yet"),
        gaps = list_or(&profile.gaps, "none yet"),
        mistakes = list_or(&profile.mistake_patterns, "none yet"),
        weaknesses = list_or(&profile.recent_weaknesses, "none yet"),
        known = list_or(&profile.known_concepts, "none yet"),
    )
}

impl Agents {
    pub(crate) fn describe_problem(&self, problem: &Problem) -> String {
        let mut out = format!(
            "PROBLEM: {} (difficulty {}/5)\nConcepts: {}\n\n{}",
            problem.title,
            problem.difficulty,
            self.problem_concepts(problem),
            problem.description.trim(),
        );
        if !problem.constraints.is_empty() {
            out.push_str("\n\nConstraints:\n");
            for c in &problem.constraints {
                out.push_str(&format!("- {c}\n"));
            }
        }
        out
    }

    /// Review one submission.
    pub async fn review(
        &self,
        profile: &Profile,
        problem: &Problem,
        code: &str,
        language: &str,
    ) -> Result<ReviewOutcome, AgentError> {
        let system = self.prompts.load("reviewer")?;
        let prompt = format!(
            "{}\n\n{}\n\nSUBMISSION ({language}):\n```{language}\n{}\n```",
            personalisation(profile),
            self.describe_problem(problem),
            code.trim_end(),
        );

        tracing::debug!(user_id = %profile.user_id, problem_id = %problem.id, "running reviewer");
        let value = self.llm.complete_json(&system, &prompt, TEMPERATURE, MAX_TOKENS).await?;
        let outcome: ReviewOutcome = serde_json::from_value(value)?;
        tracing::info!(
            user_id = %profile.user_id,
            problem_id = %problem.id,
            score = outcome.score,
            "review complete"
        );
        Ok(outcome)
    }
}
