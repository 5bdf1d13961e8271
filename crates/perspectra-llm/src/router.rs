//! LLM router: a primary backend with an optional fallback.
//!
//! Each backend is tried up to `max_attempts` times with exponential backoff.
//! When the primary is exhausted the fallback gets the same treatment.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::audit::LlmAuditEntry;
use crate::backend::{LlmBackend, LlmError, LlmRequest, LlmResponse};
use crate::json::extract_json;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), ..Self::default() }
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay after the `failed`-th failed attempt (1-based).
    pub fn delay_after(&self, failed: u32) -> Duration {
        let factor = 2u32.saturating_pow(failed.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

pub struct FallbackRouter {
    primary: Arc<dyn LlmBackend>,
    fallback: Option<Arc<dyn LlmBackend>>,
    retry: RetryPolicy,
}

impl FallbackRouter {
    pub fn new(primary: Arc<dyn LlmBackend>, retry: RetryPolicy) -> Self {
        Self { primary, fallback: None, retry }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn LlmBackend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn primary(&self) -> &Arc<dyn LlmBackend> {
        &self.primary
    }

    fn chain(&self) -> impl Iterator<Item = &Arc<dyn LlmBackend>> {
        std::iter::once(&self.primary).chain(self.fallback.iter())
    }

    /// Plain completion with fallback.
    pub async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut last_err = None;
        for backend in self.chain() {
            match self.call_with_retry(backend.as_ref(), req.clone()).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    tracing::warn!(
                        provider = backend.provider(),
                        model = backend.model_id(),
                        error = %e,
                        "LLM backend failed, trying next"
                    );
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| LlmError::Unavailable("no backend configured".into())))
    }

    pub async fn complete_text(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let req = LlmRequest::new(system, prompt).temperature(temperature).max_tokens(max_tokens);
        Ok(self.complete(req).await?.content)
    }

    /// JSON completion. Per backend: JSON mode first, then plain mode if the
    /// provider rejects it; the output is then parsed with [`extract_json`].
    pub async fn complete_json(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<serde_json::Value, LlmError> {
        let base = LlmRequest::new(system, prompt).temperature(temperature).max_tokens(max_tokens);
        let mut last_err = None;

        for backend in self.chain() {
            match self.json_attempt(backend.as_ref(), &base).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        provider = backend.provider(),
                        model = backend.model_id(),
                        error = %e,
                        "JSON completion failed, trying next backend"
                    );
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| LlmError::Unavailable("no backend configured".into())))
    }

    async fn json_attempt(&self, backend: &dyn LlmBackend, base: &LlmRequest) -> Result<serde_json::Value, LlmError> {
        let mut req = base.clone();
        req.json_mode = true;
        let resp = match self.call_with_retry(backend, req).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(provider = backend.provider(), error = %e, "JSON mode rejected, retrying without");
                self.call_with_retry(backend, base.clone()).await?
            }
        };
        extract_json(&resp.content)
    }

    async fn call_with_retry(&self, backend: &dyn LlmBackend, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let started = Instant::now();
            match backend.complete(req.clone()).await {
                Ok(resp) => {
                    let latency_ms = started.elapsed().as_millis() as u64;
                    LlmAuditEntry::new(backend.provider(), &resp, req.json_mode, latency_ms).emit();
                    return Ok(resp);
                }
                Err(e) if attempt < attempts => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::debug!(
                        provider = backend.provider(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "LLM call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
