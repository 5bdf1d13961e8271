//! LLM backend trait and the OpenAI-compatible implementation.
//!
//! Every supported provider speaks the OpenAI chat-completions format:
//!   OpenRouter: https://openrouter.ai/api/v1 (sends HTTP-Referer / X-Title)
//!   Groq      : https://api.groq.com/openai/v1
//!   OpenAI    : https://api.openai.com/v1

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(String),
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,   // "system" | "user" | "assistant"
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask for `response_format: {"type": "json_object"}`.
    #[serde(default)]
    pub json_mode: bool,
}

impl LlmRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(prompt)],
            ..Default::default()
        }
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
    /// Provider name used in logs and audit entries.
    fn provider(&self) -> &str;
}

// ── Providers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    Groq,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenAi => "https://api.openai.com/v1",
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "groq" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAi),
            other => Err(LlmError::Unavailable(format!("unknown provider '{other}'"))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Helpers: OpenAI-style wire format ─────────────────────────────────────────

fn parse_openai_response(json: &serde_json::Value, fallback_model: &str) -> LlmResponse {
    LlmResponse {
        content: json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string(),
        model: json["model"]
            .as_str()
            .unwrap_or(fallback_model)
            .to_string(),
        prompt_tokens:     json["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    let body: serde_json::Value = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    if status >= 400 {
        let msg = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| text.chars().take(200).collect());
        return Err(LlmError::ApiError { status, message: msg });
    }
    if body.is_null() {
        return Err(LlmError::InvalidJson(text.chars().take(200).collect()));
    }
    Ok(body)
}

// ── OpenAI-compatible backend ────────────────────────────────────────────────

pub struct OpenAiCompatibleBackend {
    pub provider: String,
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretString>,
    extra_headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            provider: provider.into(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()).map(SecretString::from),
            extra_headers: Vec::new(),
            client,
        })
    }

    /// Backend for a known provider. OpenRouter gets its attribution headers.
    pub fn for_provider(
        provider: Provider,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        app_url: &str,
        app_name: &str,
    ) -> Result<Self, LlmError> {
        let backend = Self::new(provider.as_str(), provider.base_url(), model, api_key, timeout)?;
        Ok(match provider {
            Provider::OpenRouter => backend
                .with_header("HTTP-Referer", app_url)
                .with_header("X-Title", app_name),
            _ => backend,
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = match &self.api_key {
            Some(k) => req.bearer_auth(k.expose_secret()),
            None    => req,
        };
        self.extra_headers
            .iter()
            .fold(req, |req, (name, value)| req.header(name.as_str(), value.as_str()))
    }

    fn request_body(&self, req: &LlmRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":       req.model.as_deref().unwrap_or(&self.model),
            "messages":    req.messages,
            "max_tokens":  req.max_tokens.unwrap_or(2048),
            "temperature": req.temperature.unwrap_or(0.7),
        });
        if req.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        if self.api_key.is_none() {
            return Err(LlmError::Unavailable(format!("no API key configured for {}", self.provider)));
        }
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.request_body(&req);
        let resp = self.auth(self.client.post(&url)).json(&body).send().await?;
        let json = check_response_status(resp).await?;
        Ok(parse_openai_response(&json, &self.model))
    }

    fn model_id(&self) -> &str { &self.model }
    fn provider(&self) -> &str { &self.provider }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(provider: Provider, key: Option<&str>) -> OpenAiCompatibleBackend {
        OpenAiCompatibleBackend::for_provider(
            provider,
            "test-model",
            key.map(str::to_string),
            Duration::from_secs(5),
            "https://perspectra.app",
            "Perspectra",
        )
        .unwrap()
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenRouter".parse::<Provider>().unwrap(), Provider::OpenRouter);
        assert_eq!(Provider::Groq.base_url(), "https://api.groq.com/openai/v1");
        assert!("anthropic".parse::<Provider>().is_err());
    }

    #[test]
    fn test_openrouter_sends_attribution_headers() {
        let b = backend(Provider::OpenRouter, Some("sk-or"));
        let names: Vec<&str> = b.extra_headers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["HTTP-Referer", "X-Title"]);
        assert!(backend(Provider::Groq, Some("gsk")).extra_headers.is_empty());
    }

    #[test]
    fn test_json_mode_adds_response_format() {
        let b = backend(Provider::OpenAi, Some("sk"));
        let mut req = LlmRequest::new("sys", "hi").temperature(0.2);
        assert!(b.request_body(&req).get("response_format").is_none());
        req.json_mode = true;
        let body = b.request_body(&req);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[test]
    fn test_parse_openai_response() {
        let json = serde_json::json!({
            "model": "m",
            "choices": [{"message": {"content": "hello"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1}
        });
        let r = parse_openai_response(&json, "fallback");
        assert_eq!(r.content, "hello");
        assert_eq!(r.prompt_tokens, 3);
        assert_eq!(parse_openai_response(&serde_json::json!({}), "fallback").model, "fallback");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let b = backend(Provider::Groq, Some(""));
        assert!(!b.has_api_key());
        let err = b.complete(LlmRequest::new("s", "p")).await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable(_)));
    }
}
