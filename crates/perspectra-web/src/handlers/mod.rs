//! HTTP handlers for all API routes.

pub mod auth;
pub mod graph;
pub mod insights;
pub mod problems;
pub mod profile;
pub mod review;
pub mod system;
pub mod tutor;

use uuid::Uuid;

use perspectra_common::{ApiError, Problem, Profile};

use crate::state::AppState;

pub(crate) async fn load_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    state
        .store
        .profiles
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

pub(crate) async fn load_problem(state: &AppState, problem_id: &str) -> Result<Problem, ApiError> {
    state
        .store
        .problems
        .get(problem_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Problem not found".to_string()))
}
