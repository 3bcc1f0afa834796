//! Curriculum search handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use tutor_core::content::store::ContentStore;
use tutor_types::content::ContentItem;

use super::RequestClock;
use super::tutor::validate_grade;
use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Hard cap on `limit`.
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub grade: Option<i32>,
    pub limit: Option<usize>,
}

/// GET /api/v1/curriculum/search?q=&grade=&limit= - keyword search.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ContentItem>>>, AppError> {
    let clock = RequestClock::start();

    if query.q.trim().is_empty() {
        return Err(AppError::Validation("q must not be empty".into()));
    }
    if let Some(grade) = query.grade {
        validate_grade(grade)?;
    }
    let limit = query
        .limit
        .unwrap_or(state.config.tutor.max_snippets)
        .clamp(1, MAX_LIMIT);

    let items = state.store.search(&query.q, query.grade, limit).await?;

    Ok(Json(
        ApiResponse::success(items, clock.request_id.clone(), clock.elapsed_ms())
            .with_link("self", "/api/v1/curriculum/search"),
    ))
}
