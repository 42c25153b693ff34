//! Repository traits for the persisted stores. The engine only ever talks
//! to these, so the Postgres implementations can be swapped for the
//! in-memory ones in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ember_shared::clients::db::DbPool;
use ember_shared::errors::AppResult;

use crate::models::{FilterSettings, Match, NewProfile, NewReaction, Profile, Reaction, ReactionKind};

pub mod memory;
pub mod postgres;

/// Outcome of the insert-if-absent match write. The unordered pair is
/// unique, so a concurrent or repeated insert reports `AlreadyMatched`
/// instead of failing.
#[derive(Debug)]
pub enum MatchInsert {
    Created(Match),
    AlreadyMatched,
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, identity: i64) -> AppResult<Option<Profile>>;

    async fn exists(&self, identity: i64) -> AppResult<bool>;

    /// Full replacement: every column is written from `profile`, including
    /// `None` values. Only `created_at` survives from an earlier row.
    async fn upsert(&self, profile: NewProfile) -> AppResult<Profile>;

    /// Every profile except the viewer's own.
    async fn list_others(&self, identity: i64) -> AppResult<Vec<Profile>>;
}

#[async_trait]
pub trait ReactionRepo: Send + Sync {
    /// Append-only; repeated reactions toward the same target are new rows.
    async fn append(&self, reaction: NewReaction) -> AppResult<Reaction>;

    /// Identities the actor has reacted to (any action) since `since`.
    async fn list_recent_targets(&self, actor: i64, since: DateTime<Utc>) -> AppResult<Vec<i64>>;

    async fn exists(&self, actor: i64, target: i64, kind: ReactionKind) -> AppResult<bool>;
}

#[async_trait]
pub trait MatchRepo: Send + Sync {
    async fn exists(&self, user_low: i64, user_high: i64) -> AppResult<bool>;

    /// Insert-if-absent; callers pass the canonical ordering
    /// (`user_low < user_high`).
    async fn insert(&self, user_low: i64, user_high: i64, at: DateTime<Utc>) -> AppResult<MatchInsert>;

    async fn list_for(&self, identity: i64) -> AppResult<Vec<Match>>;
}

#[async_trait]
pub trait FilterRepo: Send + Sync {
    async fn get(&self, identity: i64) -> AppResult<Option<FilterSettings>>;

    /// Creates the row on first use; never touches `max_distance_km`.
    async fn set_targets(&self, identity: i64, targets: Vec<String>) -> AppResult<FilterSettings>;

    /// Creates the row on first use; never touches `targets`.
    async fn set_distance(&self, identity: i64, max_km: Option<f64>) -> AppResult<FilterSettings>;
}

/// The full set of stores the engine needs, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepo>,
    pub reactions: Arc<dyn ReactionRepo>,
    pub matches: Arc<dyn MatchRepo>,
    pub filters: Arc<dyn FilterRepo>,
}

impl Repositories {
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            profiles: Arc::new(postgres::PgProfileRepo::new(pool.clone())),
            reactions: Arc::new(postgres::PgReactionRepo::new(pool.clone())),
            matches: Arc::new(postgres::PgMatchRepo::new(pool.clone())),
            filters: Arc::new(postgres::PgFilterRepo::new(pool)),
        }
    }

    /// Mutex-map stores; used by the test-suite.
    pub fn memory() -> Self {
        Self {
            profiles: Arc::new(memory::MemoryProfileRepo::new()),
            reactions: Arc::new(memory::MemoryReactionRepo::new()),
            matches: Arc::new(memory::MemoryMatchRepo::new()),
            filters: Arc::new(memory::MemoryFilterRepo::new()),
        }
    }
}
