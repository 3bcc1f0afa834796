//! Health check.

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /health (and /api/v1/health) - liveness, active gateway and how many
/// lessons the curriculum store holds.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let lessons = state
        .store
        .count_lessons()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to query curriculum store: {e}")))?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "gateway": state.tutor.gateway_name(),
        "lessons": lessons,
    })))
}
