use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use ember_shared::errors::AppResult;
use ember_shared::types::ApiResponse;

use crate::matching::selector;
use crate::models::Profile;
use crate::AppState;

/// GET /browse/:identity/next
///
/// An empty candidate set is a normal outcome, not an error; the transport
/// decides how to word it.
pub async fn next_candidate(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<Profile>>>> {
    let candidate = selector::select_candidate(
        &*state.repos.profiles,
        &*state.repos.reactions,
        &*state.repos.filters,
        identity,
        Utc::now(),
    )
    .await?;

    if candidate.is_none() {
        return Ok(Json(ApiResponse::ok_with_message(
            None,
            "no eligible profiles right now",
        )));
    }

    Ok(Json(ApiResponse::ok(candidate)))
}
