//! Mutex-map implementations of the repository traits. These back the
//! test-suite and mirror the Postgres semantics, including the
//! insert-if-absent match contract and the untouched sibling column on
//! partial filter updates.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ember_shared::errors::AppResult;

use crate::models::{FilterSettings, Match, NewProfile, NewReaction, Profile, Reaction, ReactionKind};

use super::{FilterRepo, MatchInsert, MatchRepo, ProfileRepo, ReactionRepo};

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// --- Profiles ---

#[derive(Default)]
pub struct MemoryProfileRepo {
    rows: Mutex<HashMap<i64, Profile>>,
}

impl MemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepo for MemoryProfileRepo {
    async fn get(&self, identity: i64) -> AppResult<Option<Profile>> {
        Ok(guard(&self.rows).get(&identity).cloned())
    }

    async fn exists(&self, identity: i64) -> AppResult<bool> {
        Ok(guard(&self.rows).contains_key(&identity))
    }

    async fn upsert(&self, profile: NewProfile) -> AppResult<Profile> {
        let mut rows = guard(&self.rows);
        let now = Utc::now();
        let created_at = rows
            .get(&profile.identity)
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let stored = Profile {
            identity: profile.identity,
            display_name: profile.display_name,
            gender: profile.gender,
            age: profile.age,
            city: profile.city,
            latitude: profile.latitude,
            longitude: profile.longitude,
            target: profile.target,
            bio: profile.bio,
            photo_ref: profile.photo_ref,
            created_at,
            updated_at: now,
        };
        rows.insert(stored.identity, stored.clone());
        Ok(stored)
    }

    async fn list_others(&self, identity: i64) -> AppResult<Vec<Profile>> {
        Ok(guard(&self.rows)
            .values()
            .filter(|p| p.identity != identity)
            .cloned()
            .collect())
    }
}

// --- Reactions ---

#[derive(Default)]
pub struct MemoryReactionRepo {
    rows: Mutex<Vec<Reaction>>,
}

impl MemoryReactionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReactionRepo for MemoryReactionRepo {
    async fn append(&self, reaction: NewReaction) -> AppResult<Reaction> {
        let stored = Reaction {
            id: Uuid::new_v4(),
            actor_id: reaction.actor_id,
            target_id: reaction.target_id,
            action: reaction.action,
            created_at: reaction.created_at,
        };
        guard(&self.rows).push(stored.clone());
        Ok(stored)
    }

    async fn list_recent_targets(&self, actor: i64, since: DateTime<Utc>) -> AppResult<Vec<i64>> {
        let rows = guard(&self.rows);
        let mut targets: Vec<i64> = Vec::new();
        for r in rows.iter() {
            if r.actor_id == actor && r.created_at >= since && !targets.contains(&r.target_id) {
                targets.push(r.target_id);
            }
        }
        Ok(targets)
    }

    async fn exists(&self, actor: i64, target: i64, kind: ReactionKind) -> AppResult<bool> {
        Ok(guard(&self.rows)
            .iter()
            .any(|r| r.actor_id == actor && r.target_id == target && r.action == kind.as_str()))
    }
}

// --- Matches ---

#[derive(Default)]
pub struct MemoryMatchRepo {
    rows: Mutex<Vec<Match>>,
}

impl MemoryMatchRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepo for MemoryMatchRepo {
    async fn exists(&self, user_low: i64, user_high: i64) -> AppResult<bool> {
        Ok(guard(&self.rows)
            .iter()
            .any(|m| m.user_low == user_low && m.user_high == user_high))
    }

    async fn insert(&self, user_low: i64, user_high: i64, at: DateTime<Utc>) -> AppResult<MatchInsert> {
        let mut rows = guard(&self.rows);
        if rows.iter().any(|m| m.user_low == user_low && m.user_high == user_high) {
            return Ok(MatchInsert::AlreadyMatched);
        }

        let stored = Match {
            id: Uuid::new_v4(),
            user_low,
            user_high,
            created_at: at,
        };
        rows.push(stored.clone());
        Ok(MatchInsert::Created(stored))
    }

    async fn list_for(&self, identity: i64) -> AppResult<Vec<Match>> {
        let mut found: Vec<Match> = guard(&self.rows)
            .iter()
            .filter(|m| m.user_low == identity || m.user_high == identity)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

// --- Filter settings ---

#[derive(Default)]
pub struct MemoryFilterRepo {
    rows: Mutex<HashMap<i64, FilterSettings>>,
}

impl MemoryFilterRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn blank_settings(identity: i64, now: DateTime<Utc>) -> FilterSettings {
    FilterSettings {
        identity,
        targets: serde_json::json!([]),
        max_distance_km: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl FilterRepo for MemoryFilterRepo {
    async fn get(&self, identity: i64) -> AppResult<Option<FilterSettings>> {
        Ok(guard(&self.rows).get(&identity).cloned())
    }

    async fn set_targets(&self, identity: i64, targets: Vec<String>) -> AppResult<FilterSettings> {
        let mut rows = guard(&self.rows);
        let now = Utc::now();
        let entry = rows.entry(identity).or_insert_with(|| blank_settings(identity, now));
        entry.targets = serde_json::json!(targets);
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn set_distance(&self, identity: i64, max_km: Option<f64>) -> AppResult<FilterSettings> {
        let mut rows = guard(&self.rows);
        let now = Utc::now();
        let entry = rows.entry(identity).or_insert_with(|| blank_settings(identity, now));
        entry.max_distance_km = max_km;
        entry.updated_at = now;
        Ok(entry.clone())
    }
}
