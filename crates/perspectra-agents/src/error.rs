use perspectra_common::ApiError;
use perspectra_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Model returned an unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("Prompt '{0}' is not defined")]
    UnknownPrompt(String),

    #[error("Failed to read prompt {path}: {source}")]
    PromptIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Llm(_) | AgentError::Shape(_) => {
                ApiError::Upstream(format!("LLM inference failed: {err}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}
