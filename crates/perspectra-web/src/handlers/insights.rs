use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use perspectra_common::{ApiError, LearningInsights};

use crate::auth::AuthUser;
use crate::handlers::load_profile;
use crate::state::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Option<LearningInsights>,
    pub submissions_count: u32,
    pub last_summarized_at: u32,
}

/// GET /insights/me
pub async fn my_insights(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<InsightsResponse>, ApiError> {
    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(InsightsResponse {
        insights: profile.insights,
        submissions_count: profile.submissions_count,
        last_summarized_at: profile.last_summarized_at,
    }))
}
