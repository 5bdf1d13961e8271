//! Socratic tutor and hints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use perspectra_agents::ChatTurn;
use perspectra_common::{ApiError, ProfileUpdate};

use crate::auth::AuthUser;
use crate::extract::ApiJson;
use crate::handlers::{load_problem, load_profile};
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub problem_id: String,
    pub question: String,
    #[serde(default)]
    pub conversation_history: Option<Vec<ChatTurn>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct HintRequest {
    pub problem_id: String,
    #[serde(default)]
    pub current_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HintResponse {
    pub hint: String,
}

/// POST /tutor/ask
pub async fn ask(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::Validation("Question is required".to_string()));
    }
    let problem = load_problem(&state, &req.problem_id).await?;
    let profile = load_profile(&state, auth.user_id).await?;
    let history = req.conversation_history.unwrap_or_default();

    let response = state.agents.tutor(&req.question, &problem, &profile, &history).await?;
    Ok(Json(AskResponse { response }))
}

/// POST /tutor/hint
pub async fn hint(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<HintRequest>,
) -> Result<Json<HintResponse>, ApiError> {
    let problem = load_problem(&state, &req.problem_id).await?;
    let profile = load_profile(&state, auth.user_id).await?;

    let hint = state.agents.hint(&problem, &profile, req.current_code.as_deref()).await?;
    state
        .store
        .profiles
        .update(auth.user_id, ProfileUpdate { hint: Some(hint.clone()), ..Default::default() })
        .await?;

    state.publish(AppEvent::HintGiven { user_id: auth.user_id, problem_id: problem.id });
    Ok(Json(HintResponse { hint }))
}
