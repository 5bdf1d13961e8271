//! System prompts.
//!
//! Built-in prompts are compiled in. A prompt directory, when configured,
//! overrides them per name with `<dir>/<name>.md`. Loaded prompts are cached
//! unless hot reload is on, in which case every load reads the file again.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AgentError;

const BUILTIN: &[(&str, &str)] = &[
    ("reviewer", include_str!("../prompts/reviewer.md")),
    ("tutor", include_str!("../prompts/tutor.md")),
    ("hint", include_str!("../prompts/hint.md")),
    ("onboarding", include_str!("../prompts/onboarding.md")),
    ("background", include_str!("../prompts/background.md")),
];

pub struct PromptLoader {
    dir: Option<PathBuf>,
    hot_reload: bool,
    cache: RwLock<HashMap<String, String>>,
}

impl PromptLoader {
    pub fn new(dir: Option<PathBuf>, hot_reload: bool) -> Self {
        Self { dir, hot_reload, cache: RwLock::new(HashMap::new()) }
    }

    /// Built-in prompts only.
    pub fn builtin() -> Self {
        Self::new(None, false)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }

    pub fn load(&self, name: &str) -> Result<String, AgentError> {
        if !self.hot_reload {
            if let Some(hit) = self.cache.read().ok().and_then(|c| c.get(name).cloned()) {
                return Ok(hit);
            }
        }

        let content = self.read(name)?;

        if !self.hot_reload {
            if let Ok(mut cache) = self.cache.write() {
                cache.insert(name.to_string(), content.clone());
            }
        }
        Ok(content)
    }

    /// Drop one cached prompt, or all of them.
    pub fn invalidate(&self, name: Option<&str>) {
        if let Ok(mut cache) = self.cache.write() {
            match name {
                Some(n) => { cache.remove(n); }
                None => cache.clear(),
            }
        }
    }

    fn read(&self, name: &str) -> Result<String, AgentError> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{name}.md"));
            if path.exists() {
                tracing::debug!(prompt = name, path = %path.display(), "loading prompt override");
                return std::fs::read_to_string(&path)
                    .map(|s| s.trim().to_string())
                    .map_err(|source| AgentError::PromptIo {
                        path: path.display().to_string(),
                        source,
                    });
            }
        }
        BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, body)| body.trim().to_string())
            .ok_or_else(|| AgentError::UnknownPrompt(name.to_string()))
    }
}
