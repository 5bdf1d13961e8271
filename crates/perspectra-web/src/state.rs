//! Shared application state for the web server.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use perspectra_agents::Agents;
use perspectra_config::AgentsConfig;
use perspectra_db::Store;
use perspectra_kg::ConceptGraph;

use crate::auth::JwtKeys;

/// Events pushed to the owning user's SSE stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A submission was reviewed and stored
    ReviewCompleted { user_id: Uuid, review_id: Uuid, problem_id: String, score: u8 },
    /// A hint was generated and appended to the profile
    HintGiven { user_id: Uuid, problem_id: String },
    /// The background agent refreshed the learning insights
    InsightsUpdated { user_id: Uuid, submissions_count: u32 },
}

impl AppEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            AppEvent::ReviewCompleted { user_id, .. }
            | AppEvent::HintGiven { user_id, .. }
            | AppEvent::InsightsUpdated { user_id, .. } => *user_id,
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub store: Store,
    pub graph: Arc<ConceptGraph>,
    pub agents: Arc<Agents>,
    pub jwt: JwtKeys,
    pub agents_config: AgentsConfig,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(
        store: Store,
        graph: Arc<ConceptGraph>,
        agents: Arc<Agents>,
        jwt: JwtKeys,
        agents_config: AgentsConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self { store, graph, agents, jwt, agents_config, event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Fire-and-forget; no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
