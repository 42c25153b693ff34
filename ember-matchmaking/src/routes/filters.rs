use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use ember_shared::errors::AppResult;
use ember_shared::types::ApiResponse;

use crate::filters;
use crate::models::FilterSettings;
use crate::AppState;

/// GET /filters/:identity
pub async fn get_filters(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<FilterSettings>>>> {
    let settings = state.repos.filters.get(identity).await?;
    Ok(Json(ApiResponse::ok(settings)))
}

#[derive(Debug, Deserialize)]
pub struct TargetsRequest {
    pub targets: Vec<String>,
}

/// PUT /filters/:identity/targets
pub async fn set_targets(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
    Json(req): Json<TargetsRequest>,
) -> AppResult<Json<ApiResponse<FilterSettings>>> {
    let settings =
        filters::set_target_filters(&*state.repos.filters, identity, req.targets).await?;
    Ok(Json(ApiResponse::ok(settings)))
}

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    /// `null` means unlimited.
    pub max_distance_km: Option<f64>,
}

/// PUT /filters/:identity/distance
pub async fn set_distance(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
    Json(req): Json<DistanceRequest>,
) -> AppResult<Json<ApiResponse<FilterSettings>>> {
    let settings =
        filters::set_distance_filter(&*state.repos.filters, identity, req.max_distance_km).await?;
    Ok(Json(ApiResponse::ok(settings)))
}
