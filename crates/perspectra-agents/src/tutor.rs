//! Socratic tutor and progressive hints.

use serde::{Deserialize, Serialize};

use perspectra_common::{Problem, Profile};

use crate::error::AgentError;
use crate::{list_or, text_or, Agents};

const TUTOR_TEMPERATURE: f32 = 0.65;
const TUTOR_MAX_TOKENS: u32 = 500;
const HINT_TEMPERATURE: f32 = 0.55;
const HINT_MAX_TOKENS: u32 = 180;

/// Messages of conversation history shown to the tutor (three exchanges).
pub const HISTORY_WINDOW: usize = 6;
/// Lines of the student's current code shown to the hint agent.
pub const CODE_SNAPSHOT_LINES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDepth {
    Early,
    Mid,
    Deep,
}

impl SessionDepth {
    /// Hints already given are the proxy for how far into a problem the student is.
    pub fn from_hints(hints_given: usize) -> Self {
        match hints_given {
            0..=1 => SessionDepth::Early,
            2..=4 => SessionDepth::Mid,
            _ => SessionDepth::Deep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionDepth::Early => "early",
            SessionDepth::Mid => "mid",
            SessionDepth::Deep => "deep",
        }
    }
}

pub fn tutor_context(
    agents: &Agents,
    question: &str,
    problem: &Problem,
    profile: &Profile,
    history: &[ChatTurn],
) -> String {
    let hints_given = profile.recent_hints.len();
    let depth = SessionDepth::from_hints(hints_given);

    let history_block = if history.is_empty() {
        "None yet.".to_string()
    } else {
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        history[start..]
            .iter()
            .map(|t| format!("  [{}]: {}", t.role.to_uppercase(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## STUDENT\n\
         Experience level: {experience}\n\
         Preferred style: {style}\n\
         Thinking style: {thinking}\n\
         Background: {background}\n\
         Goal: {goal}\n\
         Learning velocity: {velocity}\n\
         Strengths: {strengths}\n\
         Gaps: {gaps}\n\
         Mistake patterns: {mistakes}\n\
         Recent weaknesses: {weaknesses}\n\
         Known concepts: {known}\n\
         Session depth: {depth} (hints given: {hints_given})\n\n\
         ## PROBLEM\n\
         Title: {title}\n\
         Description: {description}\n\
         Concepts: {concepts}\n\n\
         ## CONVERSATION SO FAR\n\
         {history_block}\n\n\
         ## QUESTION\n\
         {question}\n\n\
         Guide, do not answer. End with exactly one question.",
        experience = profile.experience_level,
        style = profile.preferred_style,
        thinking = profile.thinking_style,
        background = text_or(&profile.background, "not specified"),
        goal = text_or(&profile.goal, "general DSA mastery"),
        velocity = profile.velocity().describe(),
        strengths = list_or(&profile.strengths, "none yet"),
        gaps = list_or(&profile.gaps, "none yet"),
        mistakes = list_or(&profile.mistake_patterns, "none yet"),
        weaknesses = list_or(&profile.recent_weaknesses, "none yet"),
        known = list_or(&profile.known_concepts, "not specified"),
        depth = depth.as_str(),
        title = problem.title,
        description = problem.description.trim(),
        concepts = agents.problem_concepts(problem),
        question = question.trim(),
    )
}

pub fn hint_context(
    agents: &Agents,
    problem: &Problem,
    profile: &Profile,
    current_code: Option<&str>,
) -> String {
    let previous = if profile.recent_hints.is_empty() {
        "  None given yet.".to_string()
    } else {
        profile
            .recent_hints
            .iter()
            .enumerate()
            .map(|(i, h)| format!("  {}. {h}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let code_block = match current_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => {
            let snapshot: Vec<&str> = code.lines().take(CODE_SNAPSHOT_LINES).collect();
            format!(
                "\n## CURRENT CODE\n```\n{}\n```\nAim at what is still missing, not at what is already correct.\n",
                snapshot.join("\n")
            )
        }
        None => String::new(),
    };

    let constraints = if problem.constraints.is_empty() {
        "none".to_string()
    } else {
        problem.constraints.join("; ")
    };

    format!(
        "## STUDENT\n\
         Experience level: {experience}\n\
         Thinking style: {thinking}\n\
         Gaps: {gaps}\n\
         Mistake patterns: {mistakes}\n\
         Recent weaknesses: {weaknesses}\n\n\
         ## PROBLEM\n\
         Title: {title}\n\
         Description: {description}\n\
         Concepts: {concepts}\n\
         Constraints: {constraints}\n\
         {code_block}\n\
         ## PREVIOUS HINTS (do not repeat or paraphrase)\n\
         {previous}\n\n\
         Give one new hint that goes beyond these.",
        experience = profile.experience_level,
        thinking = profile.thinking_style,
        gaps = list_or(&profile.gaps, "none"),
        mistakes = list_or(&profile.mistake_patterns, "none"),
        weaknesses = list_or(&profile.recent_weaknesses, "none"),
        title = problem.title,
        description = problem.description.trim(),
        concepts = agents.problem_concepts(problem),
    )
}

impl Agents {
    pub async fn tutor(
        &self,
        question: &str,
        problem: &Problem,
        profile: &Profile,
        history: &[ChatTurn],
    ) -> Result<String, AgentError> {
        let system = self.prompts.load("tutor")?;
        let prompt = tutor_context(self, question, problem, profile, history);
        tracing::info!(user_id = %profile.user_id, problem_id = %problem.id, "tutor called");
        let reply = self
            .llm
            .complete_text(&system, &prompt, TUTOR_TEMPERATURE, TUTOR_MAX_TOKENS)
            .await?;
        Ok(reply.trim().to_string())
    }

    pub async fn hint(
        &self,
        problem: &Problem,
        profile: &Profile,
        current_code: Option<&str>,
    ) -> Result<String, AgentError> {
        let system = self.prompts.load("hint")?;
        let prompt = hint_context(self, problem, profile, current_code);
        tracing::info!(
            user_id = %profile.user_id,
            problem_id = %problem.id,
            previous = profile.recent_hints.len(),
            "hint called"
        );
        let hint = self
            .llm
            .complete_text(&system, &prompt, HINT_TEMPERATURE, HINT_MAX_TOKENS)
            .await?;
        Ok(hint.trim().to_string())
    }
}
