//! Problem catalogue.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use perspectra_common::{ApiError, Problem, ProblemSummary};
use perspectra_db::ProblemFilter;

use crate::extract::{ApiPath, ApiQuery};
use crate::handlers::load_problem;
use crate::state::SharedState;

pub const MAX_LISTED: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub difficulty: Option<u8>,
    pub concept_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProblemList {
    pub problems: Vec<ProblemSummary>,
    pub total: usize,
}

/// GET /problems/list
pub async fn list_problems(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ProblemList>, ApiError> {
    if let Some(d) = query.difficulty {
        if !(1..=5).contains(&d) {
            return Err(ApiError::Validation("difficulty must be between 1 and 5".to_string()));
        }
    }
    let filter = ProblemFilter {
        difficulty: query.difficulty,
        concept_id: query.concept_id.filter(|c| !c.trim().is_empty()),
        limit: MAX_LISTED,
    };
    let problems: Vec<ProblemSummary> = state
        .store
        .problems
        .list(&filter)
        .await?
        .iter()
        .map(Problem::summary)
        .collect();
    let total = problems.len();
    Ok(Json(ProblemList { problems, total }))
}

/// GET /problems/{id}
pub async fn get_problem(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Problem>, ApiError> {
    Ok(Json(load_problem(&state, &id).await?))
}
