//! Code submission, pre-validation and review history.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use perspectra_agents::{background::should_summarize, fingerprint, precheck, PrecheckReport};
use perspectra_common::{ApiError, Review, ReviewHistoryEntry, ReviewOutcome};

use crate::auth::AuthUser;
use crate::background::spawn_summary;
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::{load_problem, load_profile};
use crate::state::{AppEvent, SharedState};

pub const DEFAULT_HISTORY: usize = 10;
pub const MAX_HISTORY: usize = 50;

fn default_language() -> String {
    "python".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PrecheckRequest {
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub problem_id: String,
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResult {
    pub review_id: Uuid,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
    /// Score on the 0–10 display scale.
    pub display_score: f64,
    pub submissions_count: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub reviews: Vec<ReviewHistoryEntry>,
    /// All reviews the user has, not just this page.
    pub total: usize,
}

/// POST /review/precheck
pub async fn precheck_code(
    _auth: AuthUser,
    ApiJson(req): ApiJson<PrecheckRequest>,
) -> Json<PrecheckReport> {
    Json(precheck(&req.code, &req.language))
}

/// POST /review/submit
pub async fn submit(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SubmitRequest>,
) -> Result<Json<ReviewResult>, ApiError> {
    let report = precheck(&req.code, &req.language);
    if !report.ok {
        let issues = serde_json::to_value(&report.issues)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        return Err(ApiError::Precheck(issues));
    }

    let problem = load_problem(&state, &req.problem_id).await?;
    let profile = load_profile(&state, auth.user_id).await?;

    let code_fingerprint = fingerprint(&req.code);
    if let Some(last) = state.store.reviews.latest_for_problem(auth.user_id, &problem.id).await? {
        if last.code_fingerprint == code_fingerprint {
            return Err(ApiError::Conflict(
                "Code unchanged since last submission; edit it before resubmitting".to_string(),
            ));
        }
    }

    let outcome = state.agents.review(&profile, &problem, &req.code, &req.language).await?;

    let review = Review {
        id: Uuid::new_v4(),
        user_id: auth.user_id,
        problem_id: problem.id.clone(),
        problem_title: problem.title.clone(),
        code: req.code,
        code_fingerprint,
        language: req.language,
        outcome,
        created_at: Utc::now(),
    };
    state.store.reviews.insert(&review).await?;

    let mut update = review.outcome.profile_update();
    update.submissions_count = Some(profile.submissions_count + 1);
    let profile = state.store.profiles.update(auth.user_id, update).await?;

    state.publish(AppEvent::ReviewCompleted {
        user_id: auth.user_id,
        review_id: review.id,
        problem_id: review.problem_id.clone(),
        score: review.outcome.score,
    });

    if should_summarize(profile.submissions_count, state.agents_config.background_every) {
        spawn_summary(state.clone(), auth.user_id);
    }

    Ok(Json(ReviewResult {
        review_id: review.id,
        display_score: review.display_score(),
        submissions_count: profile.submissions_count,
        outcome: review.outcome,
    }))
}

/// GET /review/history
pub async fn history(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY).clamp(1, MAX_HISTORY);
    let reviews = state
        .store
        .reviews
        .recent(auth.user_id, limit)
        .await?
        .iter()
        .map(Review::history_entry)
        .collect();
    let total = state.store.reviews.count_for_user(auth.user_id).await?;
    Ok(Json(HistoryResponse { reviews, total }))
}
