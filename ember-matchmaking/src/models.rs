use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{filter_settings, matches, profiles, reactions};

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles, primary_key(identity))]
pub struct Profile {
    pub identity: i64,
    pub display_name: String,
    pub gender: String,
    pub age: i32,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub target: String,
    pub bio: String,
    pub photo_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Coordinates are stored pairwise: both present or both absent.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset, Deserialize)]
#[diesel(table_name = profiles, treat_none_as_null = true)]
pub struct NewProfile {
    pub identity: i64,
    pub display_name: String,
    pub gender: String,
    pub age: i32,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub target: String,
    pub bio: String,
    pub photo_ref: Option<String>,
}

// --- Reaction ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(format!("unknown reaction action: {other}")),
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = reactions)]
pub struct Reaction {
    pub id: Uuid,
    pub actor_id: i64,
    pub target_id: i64,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reactions)]
pub struct NewReaction {
    pub actor_id: i64,
    pub target_id: i64,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl NewReaction {
    pub fn new(actor_id: i64, target_id: i64, kind: ReactionKind, at: DateTime<Utc>) -> Self {
        Self {
            actor_id,
            target_id,
            action: kind.as_str().to_string(),
            created_at: at,
        }
    }
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_low: i64,
    pub user_high: i64,
    pub created_at: DateTime<Utc>,
}

// --- FilterSettings ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = filter_settings, primary_key(identity))]
pub struct FilterSettings {
    pub identity: i64,
    pub targets: serde_json::Value,
    pub max_distance_km: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterSettings {
    /// Stored as a JSON string array; an empty array means "all targets".
    pub fn target_list(&self) -> Vec<String> {
        serde_json::from_value(self.targets.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_both_coordinates() {
        let mut profile = Profile {
            identity: 1,
            display_name: "Alex".to_string(),
            gender: "male".to_string(),
            age: 25,
            city: "Moscow".to_string(),
            latitude: Some(55.75),
            longitude: Some(37.61),
            target: "Relationship".to_string(),
            bio: "hi".to_string(),
            photo_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(profile.location(), Some((55.75, 37.61)));

        profile.longitude = None;
        assert_eq!(profile.location(), None);
    }

    #[test]
    fn test_reaction_kind_round_trip() {
        assert_eq!("like".parse::<ReactionKind>(), Ok(ReactionKind::Like));
        assert_eq!("dislike".parse::<ReactionKind>(), Ok(ReactionKind::Dislike));
        assert!("superlike".parse::<ReactionKind>().is_err());
        assert_eq!(ReactionKind::Like.to_string(), "like");
    }

    #[test]
    fn test_target_list_tolerates_bad_json() {
        let settings = FilterSettings {
            identity: 1,
            targets: serde_json::json!(["Friendship", "Dating"]),
            max_distance_km: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(settings.target_list(), vec!["Friendship", "Dating"]);

        let broken = FilterSettings {
            targets: serde_json::json!({"not": "a list"}),
            ..settings
        };
        assert!(broken.target_list().is_empty());
    }
}
