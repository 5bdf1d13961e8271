//! Learning profile and onboarding.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use perspectra_agents::ONBOARDING_QUESTIONS;
use perspectra_common::{ApiError, ExperienceLevel, LearningStyle, Profile, ProfileUpdate};

use crate::auth::AuthUser;
use crate::extract::ApiJson;
use crate::handlers::load_profile;
use crate::state::SharedState;

/// Fields a user may edit directly.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileEdit {
    pub experience_level: Option<ExperienceLevel>,
    pub preferred_style: Option<LearningStyle>,
    pub goal: Option<String>,
    pub background: Option<String>,
    pub known_concepts: Option<Vec<String>>,
}

impl From<ProfileEdit> for ProfileUpdate {
    fn from(edit: ProfileEdit) -> Self {
        ProfileUpdate {
            experience_level: edit.experience_level,
            preferred_style: edit.preferred_style,
            goal: edit.goal.map(|g| g.trim().to_string()),
            background: edit.background.map(|b| b.trim().to_string()),
            known_concepts: edit.known_concepts,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub message: String,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<&'static str>,
}

/// GET /profile/me
pub async fn get_profile(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(load_profile(&state, auth.user_id).await?))
}

/// PATCH /profile/me
pub async fn patch_profile(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(edit): ApiJson<ProfileEdit>,
) -> Result<Json<Profile>, ApiError> {
    load_profile(&state, auth.user_id).await?;
    let profile = state.store.profiles.update(auth.user_id, edit.into()).await?;
    tracing::debug!(user_id = %auth.user_id, "profile edited");
    Ok(Json(profile))
}

/// GET /profile/onboarding/questions
pub async fn onboarding_questions() -> Json<QuestionsResponse> {
    Json(QuestionsResponse { questions: ONBOARDING_QUESTIONS.to_vec() })
}

/// POST /profile/onboarding
pub async fn submit_onboarding(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>, ApiError> {
    if req.answers.values().all(|a| a.trim().is_empty()) {
        return Err(ApiError::Validation("At least one answer is required".to_string()));
    }
    load_profile(&state, auth.user_id).await?;

    let inference = state.agents.infer_onboarding(&req.answers).await?;
    let profile = state
        .store
        .profiles
        .update(auth.user_id, inference.into_update(req.answers))
        .await?;

    tracing::info!(
        user_id = %auth.user_id,
        level = %profile.experience_level,
        style = %profile.preferred_style,
        "onboarding complete"
    );
    Ok(Json(OnboardingResponse { message: "Onboarding complete".to_string(), profile }))
}
