use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use ember_shared::errors::{AppError, AppResult, ErrorCode};
use ember_shared::types::ApiResponse;

use crate::models::Profile;
use crate::AppState;

/// GET /profiles/:identity
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = state
        .repos
        .profiles
        .get(identity)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}
