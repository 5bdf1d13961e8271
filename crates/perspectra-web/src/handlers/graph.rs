//! Knowledge graph: concepts, the learner overlay, recommendations, paths and layout.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use perspectra_common::{ApiError, Concept, ConceptGraphView, StudentConceptNode};
use perspectra_kg::{
    overlay::student_nodes,
    path::shortest_path,
    recommend::{recommend, DEFAULT_LIMIT},
    Camera, GraphLayout, Recommendation,
};

use crate::auth::AuthUser;
use crate::extract::ApiQuery;
use crate::handlers::load_profile;
use crate::state::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub from_concept: String,
    pub to_concept: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LayoutQuery {
    /// Viewport size; when both are given the response carries a centred camera.
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Highlight nodes whose name contains this text.
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    #[serde(flatten)]
    pub layout: GraphLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    pub matches: Vec<String>,
}

/// GET /graph/concepts
pub async fn concepts(State(state): State<SharedState>) -> Json<ConceptGraphView<Concept>> {
    Json(ConceptGraphView {
        nodes: state.graph.concepts().to_vec(),
        edges: state.graph.edges().to_vec(),
    })
}

/// GET /graph/student
pub async fn student(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<ConceptGraphView<StudentConceptNode>>, ApiError> {
    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(ConceptGraphView {
        nodes: student_nodes(&state.graph, &profile),
        edges: state.graph.edges().to_vec(),
    }))
}

/// GET /graph/recommend
pub async fn recommendations(
    State(state): State<SharedState>,
    auth: AuthUser,
) -> Result<Json<RecommendResponse>, ApiError> {
    let profile = load_profile(&state, auth.user_id).await?;
    Ok(Json(RecommendResponse {
        recommendations: recommend(&state.graph, &profile, DEFAULT_LIMIT),
    }))
}

/// GET /graph/path
pub async fn path(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<PathQuery>,
) -> Result<Json<Value>, ApiError> {
    match shortest_path(&state.graph, &query.from_concept, &query.to_concept) {
        Some(found) => Ok(Json(json!(found))),
        None => Ok(Json(json!({
            "path": [],
            "message": format!(
                "No dependency path between '{}' and '{}'",
                query.from_concept, query.to_concept
            ),
        }))),
    }
}

/// GET /graph/layout
pub async fn layout(
    State(state): State<SharedState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<LayoutQuery>,
) -> Result<Json<LayoutResponse>, ApiError> {
    let profile = load_profile(&state, auth.user_id).await?;
    let layout = GraphLayout::build(student_nodes(&state.graph, &profile), state.graph.edges());

    let camera = match (query.width, query.height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(Camera::centered(w, h)),
        _ => None,
    };
    let matches = query
        .q
        .as_deref()
        .map(|q| layout.search(q).into_iter().map(str::to_string).collect())
        .unwrap_or_default();

    Ok(Json(LayoutResponse { layout, camera, matches }))
}
