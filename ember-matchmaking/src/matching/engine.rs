use chrono::{DateTime, Utc};

use ember_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, NewReaction, Reaction, ReactionKind};
use crate::repo::{MatchInsert, MatchRepo, ProfileRepo, ReactionRepo};

/// Canonical unordered-pair ordering: smaller identity first.
pub fn pair_key(a: i64, b: i64) -> (i64, i64) {
    if a < b { (a, b) } else { (b, a) }
}

#[derive(Debug)]
pub struct ReactionOutcome {
    pub reaction: Reaction,
    pub new_match: Option<Match>,
}

/// Appends one reaction row. History is never deduplicated; the exclusion
/// window works off the most recent rows.
pub async fn record_reaction(
    profiles: &dyn ProfileRepo,
    reactions: &dyn ReactionRepo,
    actor: i64,
    target: i64,
    kind: ReactionKind,
    now: DateTime<Utc>,
) -> AppResult<Reaction> {
    if actor == target {
        return Err(AppError::new(
            ErrorCode::CannotReactSelf,
            "cannot react to your own profile",
        ));
    }
    if !profiles.exists(actor).await? {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "actor has no profile"));
    }
    if !profiles.exists(target).await? {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "target profile not found"));
    }

    reactions.append(NewReaction::new(actor, target, kind, now)).await
}

/// Materializes the match if "like" rows exist in both directions at this
/// moment. Returns `None` both when reciprocity is missing and when the
/// pair is already matched, so calling once per like event in either
/// direction can never produce a second match row.
pub async fn check_and_create_match(
    reactions: &dyn ReactionRepo,
    matches: &dyn MatchRepo,
    a: i64,
    b: i64,
    now: DateTime<Utc>,
) -> AppResult<Option<Match>> {
    let forward = reactions.exists(a, b, ReactionKind::Like).await?;
    let backward = reactions.exists(b, a, ReactionKind::Like).await?;
    if !forward || !backward {
        return Ok(None);
    }

    let (user_low, user_high) = pair_key(a, b);
    match matches.insert(user_low, user_high, now).await? {
        MatchInsert::Created(m) => {
            tracing::info!(match_id = %m.id, user_low, user_high, "match created");
            Ok(Some(m))
        }
        MatchInsert::AlreadyMatched => Ok(None),
    }
}

/// One browse decision: record it, then run the match check for likes.
pub async fn react(
    profiles: &dyn ProfileRepo,
    reactions: &dyn ReactionRepo,
    matches: &dyn MatchRepo,
    actor: i64,
    target: i64,
    kind: ReactionKind,
    now: DateTime<Utc>,
) -> AppResult<ReactionOutcome> {
    let reaction = record_reaction(profiles, reactions, actor, target, kind, now).await?;

    let new_match = match kind {
        ReactionKind::Like => check_and_create_match(reactions, matches, actor, target, now).await?,
        ReactionKind::Dislike => None,
    };

    Ok(ReactionOutcome { reaction, new_match })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProfile;
    use crate::repo::Repositories;

    fn profile(identity: i64) -> NewProfile {
        NewProfile {
            identity,
            display_name: format!("user-{identity}"),
            gender: "other".to_string(),
            age: 30,
            city: "Kazan".to_string(),
            latitude: None,
            longitude: None,
            target: "Conversation".to_string(),
            bio: "hello".to_string(),
            photo_ref: None,
        }
    }

    async fn two_users() -> Repositories {
        let repos = Repositories::memory();
        repos.profiles.upsert(profile(7)).await.unwrap();
        repos.profiles.upsert(profile(3)).await.unwrap();
        repos
    }

    #[test]
    fn test_pair_key_orders_identities() {
        assert_eq!(pair_key(7, 3), (3, 7));
        assert_eq!(pair_key(3, 7), (3, 7));
    }

    #[tokio::test]
    async fn test_cannot_react_to_self() {
        let repos = two_users().await;
        let err = record_reaction(
            &*repos.profiles,
            &*repos.reactions,
            7,
            7,
            ReactionKind::Like,
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Known { code: ErrorCode::CannotReactSelf, .. }
        ));
    }

    #[tokio::test]
    async fn test_repeated_reactions_append_new_rows() {
        let repos = two_users().await;
        let now = Utc::now();
        let first = record_reaction(&*repos.profiles, &*repos.reactions, 7, 3, ReactionKind::Like, now)
            .await
            .unwrap();
        let second = record_reaction(&*repos.profiles, &*repos.reactions, 7, 3, ReactionKind::Like, now)
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_one_sided_like_never_matches() {
        let repos = two_users().await;
        let now = Utc::now();
        record_reaction(&*repos.profiles, &*repos.reactions, 7, 3, ReactionKind::Like, now)
            .await
            .unwrap();

        let outcome = check_and_create_match(&*repos.reactions, &*repos.matches, 7, 3, now)
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_mutual_like_matches_exactly_once() {
        let repos = two_users().await;
        let now = Utc::now();
        record_reaction(&*repos.profiles, &*repos.reactions, 7, 3, ReactionKind::Like, now)
            .await
            .unwrap();
        record_reaction(&*repos.profiles, &*repos.reactions, 3, 7, ReactionKind::Like, now)
            .await
            .unwrap();

        let first = check_and_create_match(&*repos.reactions, &*repos.matches, 7, 3, now)
            .await
            .unwrap()
            .expect("reciprocal likes create a match");
        assert_eq!((first.user_low, first.user_high), (3, 7));

        // Redundant checks from either direction are no-ops.
        assert!(check_and_create_match(&*repos.reactions, &*repos.matches, 7, 3, now)
            .await
            .unwrap()
            .is_none());
        assert!(check_and_create_match(&*repos.reactions, &*repos.matches, 3, 7, now)
            .await
            .unwrap()
            .is_none());

        let listed = repos.matches.list_for(7).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, first.id);
        assert!(repos.matches.exists(3, 7).await.unwrap());
    }

    #[tokio::test]
    async fn test_dislikes_never_create_matches() {
        let repos = two_users().await;
        let now = Utc::now();

        let outcome = react(
            &*repos.profiles,
            &*repos.reactions,
            &*repos.matches,
            7,
            3,
            ReactionKind::Dislike,
            now,
        )
        .await
        .unwrap();
        assert!(outcome.new_match.is_none());

        let outcome = react(
            &*repos.profiles,
            &*repos.reactions,
            &*repos.matches,
            3,
            7,
            ReactionKind::Dislike,
            now,
        )
        .await
        .unwrap();
        assert!(outcome.new_match.is_none());
        assert!(repos.matches.list_for(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_survives_further_reactions() {
        let repos = two_users().await;
        let now = Utc::now();

        react(&*repos.profiles, &*repos.reactions, &*repos.matches, 7, 3, ReactionKind::Like, now)
            .await
            .unwrap();
        let matched = react(&*repos.profiles, &*repos.reactions, &*repos.matches, 3, 7, ReactionKind::Like, now)
            .await
            .unwrap();
        assert!(matched.new_match.is_some());

        // A later dislike does not un-match the pair.
        react(&*repos.profiles, &*repos.reactions, &*repos.matches, 7, 3, ReactionKind::Dislike, now)
            .await
            .unwrap();
        assert_eq!(repos.matches.list_for(3).await.unwrap().len(), 1);
    }
}
