//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, graph, insights, problems, profile, review, system, tutor};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    build_router_shared(Arc::new(state))
}

/// Same as [`build_router`] for callers that keep a handle on the state.
pub fn build_router_shared(shared: SharedState) -> Router {
    Router::new()
        // Status
        .route("/",       get(system::root))
        .route("/health", get(system::health))

        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login",    post(auth::login))
        .route("/auth/me",       get(auth::me))

        // Profile
        .route("/profile/me",                   get(profile::get_profile).patch(profile::patch_profile))
        .route("/profile/onboarding/questions", get(profile::onboarding_questions))
        .route("/profile/onboarding",           post(profile::submit_onboarding))

        // Problems
        .route("/problems/list", get(problems::list_problems))
        .route("/problems/{id}", get(problems::get_problem))

        // Review
        .route("/review/precheck", post(review::precheck_code))
        .route("/review/submit",   post(review::submit))
        .route("/review/history",  get(review::history))

        // Tutor
        .route("/tutor/ask",  post(tutor::ask))
        .route("/tutor/hint", post(tutor::hint))

        // Graph
        .route("/graph/concepts",  get(graph::concepts))
        .route("/graph/student",   get(graph::student))
        .route("/graph/recommend", get(graph::recommendations))
        .route("/graph/path",      get(graph::path))
        .route("/graph/layout",    get(graph::layout))

        // Insights
        .route("/insights/me", get(insights::my_insights))

        // SSE streaming
        .route("/events", get(sse_handler))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
