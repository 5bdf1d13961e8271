//! Configuration loading for Perspectra.
//! Reads perspectra.toml from the current directory or the path in PERSPECTRA_CONFIG,
//! then applies environment overrides. A missing file means built-in defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_JWT_SECRET: &str = "change-me";
pub const KNOWN_PROVIDERS: [&str; 3] = ["openrouter", "groq", "openai"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    Override { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub llm: LlmConfig,
    pub prompts: PromptsConfig,
    pub agents: AgentsConfig,
}

// ── Server ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            env: default_env(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16    { 8000 }
fn default_env()  -> String { "development".to_string() }

impl ServerConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Database ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. When absent the server runs on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub seed_on_start: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            seed_on_start: true,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }

// ── Auth ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_expiry_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_expiry_hours: default_token_expiry_hours(),
        }
    }
}

fn default_token_expiry_hours() -> u64 { 72 }

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[redacted]")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .finish()
    }
}

// ── LLM ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub fallback_provider: Option<String>,
    pub fallback_model: String,
    pub max_attempts: u32,
    pub timeout_secs: u64,
    /// Sent to OpenRouter as HTTP-Referer.
    pub app_url: String,
    /// Sent to OpenRouter as X-Title.
    pub app_name: String,
    pub api_keys: ApiKeys,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openrouter".to_string(),
            model: "google/gemini-flash-1.5".to_string(),
            fallback_provider: Some("groq".to_string()),
            fallback_model: "llama-3.1-8b-instant".to_string(),
            max_attempts: 2,
            timeout_secs: 60,
            app_url: "https://perspectra.app".to_string(),
            app_name: "Perspectra".to_string(),
            api_keys: ApiKeys::default(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    #[serde(skip_serializing)]
    pub openrouter: Option<String>,
    #[serde(skip_serializing)]
    pub groq: Option<String>,
    #[serde(skip_serializing)]
    pub openai: Option<String>,
}

impl ApiKeys {
    pub fn for_provider(&self, provider: &str) -> Option<&str> {
        match provider {
            "openrouter" => self.openrouter.as_deref(),
            "groq" => self.groq.as_deref(),
            "openai" => self.openai.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |k: &Option<String>| if k.is_some() { "[set]" } else { "[unset]" };
        f.debug_struct("ApiKeys")
            .field("openrouter", &mask(&self.openrouter))
            .field("groq", &mask(&self.groq))
            .field("openai", &mask(&self.openai))
            .finish()
    }
}

// ── Prompts & agents ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory of `<name>.md` files overriding the built-in prompts.
    pub dir: Option<String>,
    pub hot_reload: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Run the background agent every N submissions.
    pub background_every: u32,
    /// Number of recent reviews the background agent summarises.
    pub background_window: usize,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            background_every: 5,
            background_window: 10,
        }
    }
}


impl Config {
    /// Load configuration from perspectra.toml and the environment.
    /// Checks PERSPECTRA_CONFIG first, then the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let path = std::env::var("PERSPECTRA_CONFIG")
            .unwrap_or_else(|_| "perspectra.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path, "config file not found, using defaults");
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path: path.to_string(), source },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Apply environment-style overrides. `lookup` returns the value of a variable if set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("PERSPECTRA_DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(secret) = get("PERSPECTRA_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(host) = get("PERSPECTRA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PERSPECTRA_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Override {
                key: "PERSPECTRA_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(env) = get("APP_ENV") {
            self.server.env = env;
        }
        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.llm.api_keys.openrouter = Some(key);
        }
        if let Some(key) = get("GROQ_API_KEY") {
            self.llm.api_keys.groq = Some(key);
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_keys.openai = Some(key);
        }
        if let Some(flag) = get("HOT_RELOAD_PROMPTS") {
            self.prompts.hot_reload = matches!(flag.trim(), "1" | "true" | "yes");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.auth.token_expiry_hours == 0 {
            return Err(ConfigError::Invalid("auth.token_expiry_hours must be non-zero".into()));
        }
        if self.agents.background_every == 0 {
            return Err(ConfigError::Invalid("agents.background_every must be non-zero".into()));
        }
        if self.llm.max_attempts == 0 {
            return Err(ConfigError::Invalid("llm.max_attempts must be non-zero".into()));
        }
        let providers = std::iter::once(self.llm.provider.as_str())
            .chain(self.llm.fallback_provider.as_deref());
        for provider in providers {
            if !KNOWN_PROVIDERS.contains(&provider) {
                return Err(ConfigError::Invalid(format!(
                    "unknown LLM provider '{provider}' (expected one of {})",
                    KNOWN_PROVIDERS.join(", ")
                )));
            }
        }
        if self.server.is_production() && self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::Invalid(
                "auth.jwt_secret must be changed in production (set PERSPECTRA_JWT_SECRET)".into(),
            ));
        }
        Ok(())
    }
}
