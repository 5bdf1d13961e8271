//! Service status.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /
pub async fn root(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "Perspectra API",
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.store.backend(),
        "concepts": state.graph.concepts().len(),
    }))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
