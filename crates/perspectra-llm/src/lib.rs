//! perspectra-llm: LLM backend abstraction layer.
//! OpenAI-compatible chat backends, a primary/fallback router with retries,
//! JSON extraction from model output, and per-call audit entries.

pub mod audit;
pub mod backend;
pub mod json;
pub mod router;
pub mod scripted;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message, OpenAiCompatibleBackend, Provider};
pub use router::{FallbackRouter, RetryPolicy};
pub use scripted::ScriptedBackend;
