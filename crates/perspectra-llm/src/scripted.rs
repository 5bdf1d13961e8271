//! Scripted backend that replays queued replies. Used by tests and local runs
//! without provider keys.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{LlmBackend, LlmError, LlmRequest, LlmResponse};

enum Reply {
    Text(String),
    Error(String),
}

pub struct ScriptedBackend {
    name: String,
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.lock_replies().push_back(Reply::Text(text.into()));
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.push_text(value.to_string());
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.lock_replies().push_back(Reply::Error(message.into()));
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn lock_replies(&self) -> std::sync::MutexGuard<'_, VecDeque<Reply>> {
        self.replies.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(req);
        }
        match self.lock_replies().pop_front() {
            Some(Reply::Text(content)) => Ok(LlmResponse {
                content,
                model: self.name.clone(),
                prompt_tokens: 0,
                completion_tokens: 0,
            }),
            Some(Reply::Error(message)) => Err(LlmError::ApiError { status: 500, message }),
            None => Err(LlmError::Unavailable(format!("{}: no scripted reply left", self.name))),
        }
    }

    fn model_id(&self) -> &str { &self.name }
    fn provider(&self) -> &str { "scripted" }
}
