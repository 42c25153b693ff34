use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;

use ember_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::Profile;
use crate::repo::{FilterRepo, ProfileRepo, ReactionRepo};

use super::distance::distance_km;

/// Days a previously-reacted-to candidate stays hidden from the viewer.
/// Applies to likes and dislikes alike: the viewer already decided.
pub const EXCLUSION_WINDOW_DAYS: i64 = 9;

/// Picks the next profile to show `viewer`, or `None` when nothing is
/// eligible. Read-only: recording the viewer's decision is the caller's
/// job.
///
/// The eligible set is materialized first and then drawn from uniformly,
/// so no profile is favored by iteration order.
pub async fn select_candidate(
    profiles: &dyn ProfileRepo,
    reactions: &dyn ReactionRepo,
    filters: &dyn FilterRepo,
    viewer: i64,
    now: DateTime<Utc>,
) -> AppResult<Option<Profile>> {
    let me = profiles
        .get(viewer)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "viewer has no profile"))?;

    let settings = filters.get(viewer).await?;
    let target_filter: Vec<String> = settings
        .as_ref()
        .map(|s| s.target_list())
        .unwrap_or_default();
    let max_distance_km = settings.as_ref().and_then(|s| s.max_distance_km);

    let since = now - Duration::days(EXCLUSION_WINDOW_DAYS);
    let seen: HashSet<i64> = reactions
        .list_recent_targets(viewer, since)
        .await?
        .into_iter()
        .collect();

    let mut eligible: Vec<Profile> = Vec::new();
    for candidate in profiles.list_others(viewer).await? {
        if seen.contains(&candidate.identity) {
            continue;
        }
        if !target_filter.is_empty() && !target_filter.contains(&candidate.target) {
            continue;
        }
        // The distance filter only applies when the viewer's own location
        // is known; a candidate with no coordinates can never be proven in
        // range and is dropped.
        if let (Some(max_km), Some(origin)) = (max_distance_km, me.location()) {
            if distance_km(Some(origin), candidate.location()) > max_km {
                continue;
            }
        }
        eligible.push(candidate);
    }

    tracing::debug!(viewer, eligible = eligible.len(), "candidate set materialized");

    Ok(eligible.choose(&mut rand::thread_rng()).cloned())
}
