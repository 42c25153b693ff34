use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

use ember_shared::clients::db::DbPool;
use ember_shared::errors::{AppError, AppResult};

use crate::models::{FilterSettings, Match, NewProfile, NewReaction, Profile, Reaction, ReactionKind};
use crate::schema::{filter_settings, matches, profiles, reactions};

use super::{FilterRepo, MatchInsert, MatchRepo, ProfileRepo, ReactionRepo};

type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

fn checkout(pool: &DbPool) -> AppResult<PgPooled> {
    pool.get().map_err(|e| AppError::internal(e.to_string()))
}

// --- Profiles ---

pub struct PgProfileRepo {
    pool: DbPool,
}

impl PgProfileRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    async fn get(&self, identity: i64) -> AppResult<Option<Profile>> {
        let mut conn = checkout(&self.pool)?;
        Ok(profiles::table
            .find(identity)
            .first::<Profile>(&mut conn)
            .optional()?)
    }

    async fn exists(&self, identity: i64) -> AppResult<bool> {
        Ok(self.get(identity).await?.is_some())
    }

    async fn upsert(&self, profile: NewProfile) -> AppResult<Profile> {
        let mut conn = checkout(&self.pool)?;
        let now = Utc::now();

        let stored = diesel::insert_into(profiles::table)
            .values((
                &profile,
                profiles::created_at.eq(now),
                profiles::updated_at.eq(now),
            ))
            .on_conflict(profiles::identity)
            .do_update()
            .set((&profile, profiles::updated_at.eq(now)))
            .get_result::<Profile>(&mut conn)?;

        Ok(stored)
    }

    async fn list_others(&self, identity: i64) -> AppResult<Vec<Profile>> {
        let mut conn = checkout(&self.pool)?;
        Ok(profiles::table
            .filter(profiles::identity.ne(identity))
            .load::<Profile>(&mut conn)?)
    }
}

// --- Reactions ---

pub struct PgReactionRepo {
    pool: DbPool,
}

impl PgReactionRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepo for PgReactionRepo {
    async fn append(&self, reaction: NewReaction) -> AppResult<Reaction> {
        let mut conn = checkout(&self.pool)?;
        Ok(diesel::insert_into(reactions::table)
            .values(&reaction)
            .get_result::<Reaction>(&mut conn)?)
    }

    async fn list_recent_targets(&self, actor: i64, since: DateTime<Utc>) -> AppResult<Vec<i64>> {
        let mut conn = checkout(&self.pool)?;
        Ok(reactions::table
            .filter(reactions::actor_id.eq(actor))
            .filter(reactions::created_at.ge(since))
            .select(reactions::target_id)
            .distinct()
            .load::<i64>(&mut conn)?)
    }

    async fn exists(&self, actor: i64, target: i64, kind: ReactionKind) -> AppResult<bool> {
        let mut conn = checkout(&self.pool)?;
        Ok(reactions::table
            .filter(reactions::actor_id.eq(actor))
            .filter(reactions::target_id.eq(target))
            .filter(reactions::action.eq(kind.as_str()))
            .first::<Reaction>(&mut conn)
            .optional()?
            .is_some())
    }
}

// --- Matches ---

pub struct PgMatchRepo {
    pool: DbPool,
}

impl PgMatchRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchRepo for PgMatchRepo {
    async fn exists(&self, user_low: i64, user_high: i64) -> AppResult<bool> {
        let mut conn = checkout(&self.pool)?;
        Ok(matches::table
            .filter(matches::user_low.eq(user_low))
            .filter(matches::user_high.eq(user_high))
            .first::<Match>(&mut conn)
            .optional()?
            .is_some())
    }

    async fn insert(&self, user_low: i64, user_high: i64, at: DateTime<Utc>) -> AppResult<MatchInsert> {
        let mut conn = checkout(&self.pool)?;

        // The unique constraint on the pair is the concurrency arbiter:
        // DO NOTHING yields zero rows when another writer got there first.
        let inserted = diesel::insert_into(matches::table)
            .values((
                matches::user_low.eq(user_low),
                matches::user_high.eq(user_high),
                matches::created_at.eq(at),
            ))
            .on_conflict((matches::user_low, matches::user_high))
            .do_nothing()
            .get_result::<Match>(&mut conn)
            .optional()?;

        Ok(match inserted {
            Some(m) => MatchInsert::Created(m),
            None => MatchInsert::AlreadyMatched,
        })
    }

    async fn list_for(&self, identity: i64) -> AppResult<Vec<Match>> {
        let mut conn = checkout(&self.pool)?;
        Ok(matches::table
            .filter(matches::user_low.eq(identity).or(matches::user_high.eq(identity)))
            .order(matches::created_at.desc())
            .load::<Match>(&mut conn)?)
    }
}

// --- Filter settings ---

pub struct PgFilterRepo {
    pool: DbPool,
}

impl PgFilterRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilterRepo for PgFilterRepo {
    async fn get(&self, identity: i64) -> AppResult<Option<FilterSettings>> {
        let mut conn = checkout(&self.pool)?;
        Ok(filter_settings::table
            .find(identity)
            .first::<FilterSettings>(&mut conn)
            .optional()?)
    }

    async fn set_targets(&self, identity: i64, targets: Vec<String>) -> AppResult<FilterSettings> {
        let mut conn = checkout(&self.pool)?;
        let now = Utc::now();
        let targets_json = serde_json::to_value(&targets)
            .map_err(|e| AppError::internal(e.to_string()))?;

        Ok(diesel::insert_into(filter_settings::table)
            .values((
                filter_settings::identity.eq(identity),
                filter_settings::targets.eq(&targets_json),
                filter_settings::created_at.eq(now),
                filter_settings::updated_at.eq(now),
            ))
            .on_conflict(filter_settings::identity)
            .do_update()
            .set((
                filter_settings::targets.eq(&targets_json),
                filter_settings::updated_at.eq(now),
            ))
            .get_result::<FilterSettings>(&mut conn)?)
    }

    async fn set_distance(&self, identity: i64, max_km: Option<f64>) -> AppResult<FilterSettings> {
        let mut conn = checkout(&self.pool)?;
        let now = Utc::now();

        Ok(diesel::insert_into(filter_settings::table)
            .values((
                filter_settings::identity.eq(identity),
                filter_settings::targets.eq(serde_json::json!([])),
                filter_settings::max_distance_km.eq(max_km),
                filter_settings::created_at.eq(now),
                filter_settings::updated_at.eq(now),
            ))
            .on_conflict(filter_settings::identity)
            .do_update()
            .set((
                filter_settings::max_distance_km.eq(max_km),
                filter_settings::updated_at.eq(now),
            ))
            .get_result::<FilterSettings>(&mut conn)?)
    }
}
