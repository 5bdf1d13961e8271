//! Detached background summaries.

use thiserror::Error;
use uuid::Uuid;

use perspectra_agents::AgentError;
use perspectra_common::ProfileUpdate;
use perspectra_db::DbError;

use crate::state::{AppEvent, AppState, SharedState};

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

/// Run the summary on its own task. Failures are logged and never reach the caller.
pub fn spawn_summary(state: SharedState, user_id: Uuid) {
    tokio::spawn(async move {
        match run_summary(&state, user_id).await {
            Ok(true) => tracing::info!(user_id = %user_id, "learning insights updated"),
            Ok(false) => tracing::debug!(user_id = %user_id, "nothing to summarise"),
            Err(e) => tracing::warn!(user_id = %user_id, error = %e, "background summary failed"),
        }
    });
}

/// Summarise the latest reviews into the profile's insights. Returns whether
/// insights were written.
pub async fn run_summary(state: &AppState, user_id: Uuid) -> Result<bool, JobError> {
    let Some(profile) = state.store.profiles.get(user_id).await? else {
        return Ok(false);
    };
    let reviews = state
        .store
        .reviews
        .recent(user_id, state.agents_config.background_window)
        .await?;

    let Some(insights) = state.agents.summarize(&profile, &reviews).await? else {
        return Ok(false);
    };

    let update = ProfileUpdate {
        insights: Some(insights),
        last_summarized_at: Some(profile.submissions_count),
        ..Default::default()
    };
    let profile = state.store.profiles.update(user_id, update).await?;
    state.publish(AppEvent::InsightsUpdated {
        user_id,
        submissions_count: profile.submissions_count,
    });
    Ok(true)
}
