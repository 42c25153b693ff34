use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use ember_shared::errors::AppResult;
use ember_shared::types::ApiResponse;

use crate::events::publisher;
use crate::matching::engine;
use crate::models::{Match, Reaction, ReactionKind};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub actor_id: i64,
    pub target_id: i64,
    pub action: ReactionKind,
}

#[derive(Debug, Serialize)]
pub struct ReactResponse {
    pub reaction: Reaction,
    pub matched: Option<Match>,
}

/// POST /reactions
pub async fn react(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReactRequest>,
) -> AppResult<Json<ApiResponse<ReactResponse>>> {
    let outcome = engine::react(
        &*state.repos.profiles,
        &*state.repos.reactions,
        &*state.repos.matches,
        req.actor_id,
        req.target_id,
        req.action,
        Utc::now(),
    )
    .await?;

    publisher::publish_reaction_recorded(&state.rabbitmq, &outcome.reaction).await;

    if let Some(m) = &outcome.new_match {
        // Both parties are notified downstream off this one event.
        let low_name = display_name_of(&state, m.user_low).await?;
        let high_name = display_name_of(&state, m.user_high).await?;
        publisher::publish_match_created(&state.rabbitmq, m, &low_name, &high_name).await;
    }

    Ok(Json(ApiResponse::ok(ReactResponse {
        reaction: outcome.reaction,
        matched: outcome.new_match,
    })))
}

async fn display_name_of(state: &AppState, identity: i64) -> AppResult<String> {
    Ok(state
        .repos
        .profiles
        .get(identity)
        .await?
        .map(|p| p.display_name)
        .unwrap_or_default())
}
