//! Wiring from configuration to a ready [`AppState`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use perspectra_agents::{Agents, PromptLoader};
use perspectra_config::{Config, LlmConfig};
use perspectra_db::{Database, Store};
use perspectra_kg::ConceptGraph;
use perspectra_llm::{FallbackRouter, LlmBackend, OpenAiCompatibleBackend, Provider, RetryPolicy};

use crate::auth::JwtKeys;
use crate::seed::seed;
use crate::state::AppState;

/// PostgreSQL when a URL is configured, otherwise the in-memory store.
pub async fn connect_store(config: &Config) -> anyhow::Result<Store> {
    match config.database.url.as_deref() {
        Some(url) => {
            let db = Database::connect(url, config.database.max_connections, config.database.min_connections)
                .await
                .context("connecting to PostgreSQL")?;
            db.initialize().await.context("initialising schema")?;
            let stats = db.stats().await.context("counting rows")?;
            tracing::info!(
                users = stats.users,
                problems = stats.problems,
                reviews = stats.reviews,
                concepts = stats.concepts,
                "🗄️  Connected to PostgreSQL"
            );
            Ok(Store::postgres(db.pool().clone()))
        }
        None => {
            tracing::warn!("⚠️  No database URL configured; using the in-memory store (data is lost on exit)");
            Ok(Store::in_memory())
        }
    }
}

fn backend_for(llm: &LlmConfig, provider: &str, model: &str) -> anyhow::Result<Arc<dyn LlmBackend>> {
    let provider: Provider = provider.parse()?;
    let key = llm.api_keys.for_provider(provider.as_str()).map(str::to_string);
    let backend = OpenAiCompatibleBackend::for_provider(
        provider,
        model,
        key,
        Duration::from_secs(llm.timeout_secs),
        &llm.app_url,
        &llm.app_name,
    )?;
    if !backend.has_api_key() {
        tracing::warn!(provider = provider.as_str(), "⚠️  No API key configured; calls to this provider will fail");
    }
    Ok(Arc::new(backend))
}

pub fn build_llm(llm: &LlmConfig) -> anyhow::Result<FallbackRouter> {
    let primary = backend_for(llm, &llm.provider, &llm.model)?;
    let mut router = FallbackRouter::new(primary, RetryPolicy::with_attempts(llm.max_attempts));
    if let Some(fallback) = llm.fallback_provider.as_deref() {
        router = router.with_fallback(backend_for(llm, fallback, &llm.fallback_model)?);
    }
    tracing::info!(
        provider = %llm.provider,
        model = %llm.model,
        fallback = llm.fallback_provider.as_deref().unwrap_or("none"),
        "🤖 LLM router ready"
    );
    Ok(router)
}

/// The graph as stored, or the built-in catalog when the store has none.
pub async fn load_graph(store: &Store) -> anyhow::Result<ConceptGraph> {
    let concepts = store.concepts.concepts().await?;
    if concepts.is_empty() {
        tracing::warn!("Concept store is empty; serving the built-in graph");
        return Ok(ConceptGraph::builtin()?);
    }
    let edges = store.concepts.edges().await?;
    Ok(ConceptGraph::new(concepts, edges)?)
}

pub async fn build_state(config: &Config, llm: FallbackRouter) -> anyhow::Result<AppState> {
    let store = connect_store(config).await?;
    if config.database.seed_on_start {
        seed(&store).await.context("seeding catalog")?;
    }
    let graph = load_graph(&store).await?;

    let prompts = PromptLoader::new(config.prompts.dir.as_ref().map(PathBuf::from), config.prompts.hot_reload);
    let names: HashMap<String, String> =
        graph.concepts().iter().map(|c| (c.id.clone(), c.name.clone())).collect();
    let agents = Agents::new(Arc::new(llm), Arc::new(prompts)).with_concept_names(names);

    Ok(AppState::new(
        store,
        Arc::new(graph),
        Arc::new(agents),
        JwtKeys::new(&config.auth.jwt_secret, config.auth.token_expiry_hours),
        config.agents.clone(),
    ))
}
