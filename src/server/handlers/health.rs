use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Instrumentation view: rebuild counters and the active index size.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.orchestrator.status().await;
    Json(json!({
        "model_loads": status.model_loads,
        "index_builds": status.index_builds,
        "indexed_passages": status.indexed_passages,
    }))
}
