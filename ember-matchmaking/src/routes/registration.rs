use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use ember_shared::errors::AppResult;
use ember_shared::types::ApiResponse;

use crate::events::publisher;
use crate::models::Profile;
use crate::registration::{self, Advance, RegistrationInput, Step};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub step: Step,
}

/// POST /registration/:identity/start
///
/// Begins registration for a new user or a full edit for an existing one;
/// any dialogue already in progress is silently replaced.
pub async fn start_registration(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
) -> AppResult<Json<ApiResponse<StartResponse>>> {
    let step = registration::start(&state.sessions, &*state.repos.profiles, identity).await?;
    Ok(Json(ApiResponse::ok(StartResponse { step })))
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InputResponse {
    /// Prompt the user for this step next.
    Prompt { step: Step },
    /// The answer did not validate; re-prompt the same step.
    Invalid { step: Step, reason: String },
    Completed { profile: Profile },
}

/// POST /registration/:identity/input
pub async fn submit_input(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<i64>,
    Json(input): Json<RegistrationInput>,
) -> AppResult<Json<ApiResponse<InputResponse>>> {
    let advance = registration::handle_input(
        &state.sessions,
        &*state.repos.profiles,
        &*state.resolver,
        identity,
        input,
    )
    .await?;

    let response = match advance {
        Advance::Next(step) => InputResponse::Prompt { step },
        Advance::Invalid { step, reason } => InputResponse::Invalid { step, reason },
        Advance::Completed(profile) => {
            publisher::publish_profile_registered(&state.rabbitmq, &profile).await;
            InputResponse::Completed { profile }
        }
    };

    Ok(Json(ApiResponse::ok(response)))
}
