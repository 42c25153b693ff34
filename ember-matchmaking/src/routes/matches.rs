use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use ember_shared::errors::AppResult;
use ember_shared::types::ApiResponse;

use crate::models::Match;
use crate::AppState;

/// GET /matches/:identity
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Match>>>> {
    let matches = state.repos.matches.list_for(identity).await?;
    Ok(Json(ApiResponse::ok(matches)))
}
