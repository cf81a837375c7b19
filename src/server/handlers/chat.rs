use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::core::errors::RagError;
use crate::orchestrator::RagRequest;
use crate::state::AppState;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RagRequest>,
) -> Result<impl IntoResponse, RagError> {
    let response = state.orchestrator.handle(request).await?;
    Ok(Json(response))
}
