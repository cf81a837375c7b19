use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn list_models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "models": state.models.names() }))
}

pub async fn list_datasets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "datasets": state.datasets.names() }))
}
