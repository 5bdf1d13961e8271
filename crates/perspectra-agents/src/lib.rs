//! perspectra-agents: the LLM agents behind reviews, tutoring and insights,
//! plus the code pre-validator that runs before any agent sees a submission.

pub mod background;
pub mod error;
pub mod onboarding;
pub mod precheck;
pub mod prompts;
pub mod reviewer;
pub mod tutor;

use std::collections::HashMap;
use std::sync::Arc;

use perspectra_common::Problem;
use perspectra_llm::FallbackRouter;

pub use error::AgentError;
pub use onboarding::{OnboardingInference, ONBOARDING_QUESTIONS};
pub use precheck::{fingerprint, precheck, PrecheckReport};
pub use prompts::PromptLoader;
pub use tutor::ChatTurn;

/// Shared entry point for every agent.
pub struct Agents {
    llm: Arc<FallbackRouter>,
    prompts: Arc<PromptLoader>,
    /// Concept id → display name, used when describing problems to the model.
    concept_names: HashMap<String, String>,
}

impl Agents {
    pub fn new(llm: Arc<FallbackRouter>, prompts: Arc<PromptLoader>) -> Self {
        Self { llm, prompts, concept_names: HashMap::new() }
    }

    pub fn with_concept_names(mut self, names: HashMap<String, String>) -> Self {
        self.concept_names = names;
        self
    }

    pub fn prompts(&self) -> &PromptLoader {
        &self.prompts
    }

    fn problem_concepts(&self, problem: &Problem) -> String {
        problem
            .concept_ids
            .iter()
            .map(|id| self.concept_names.get(id).map(String::as_str).unwrap_or(id.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Comma-joined list, or `fallback` when empty.
pub(crate) fn list_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Non-blank text, or `fallback`.
pub(crate) fn text_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() { fallback } else { text }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use std::sync::Arc;

    use perspectra_common::{Problem, ProblemExample};
    use perspectra_llm::{FallbackRouter, RetryPolicy, ScriptedBackend};

    use super::*;

    pub fn agents_with(backend: Arc<ScriptedBackend>) -> Agents {
        let router = FallbackRouter::new(backend, RetryPolicy::immediate(1));
        let names = [("c02", "Arrays"), ("c09", "Hash Maps & Sets")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        Agents::new(Arc::new(router), Arc::new(PromptLoader::builtin())).with_concept_names(names)
    }

    pub fn sample_problem() -> Problem {
        Problem {
            id: "two-sum".into(),
            title: "Two Sum".into(),
            description: "Return indices of the two numbers that add up to target.".into(),
            difficulty: 1,
            examples: vec![ProblemExample {
                input: "[2,7,11,15], 9".into(),
                output: "[0,1]".into(),
                explanation: None,
            }],
            constraints: vec!["2 <= n <= 10^4".into()],
            concept_ids: vec!["c02".into(), "c09".into()],
        }
    }
}
