use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event envelope wrapping all domain events published to RabbitMQ.
///
/// Routing key format: `ember.{domain}.{entity}.{action}`
/// Example: `ember.matchmaking.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub identity: Option<i64>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            identity: None,
            data,
        }
    }

    pub fn with_identity(mut self, identity: i64) -> Self {
        self.identity = Some(identity);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    pub const PROFILE_REGISTERED: &str = "ember.matchmaking.profile.registered";
    pub const REACTION_RECORDED: &str = "ember.matchmaking.reaction.recorded";
    pub const MATCH_CREATED: &str = "ember.matchmaking.match.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileRegistered {
        pub identity: i64,
        pub display_name: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ReactionRecorded {
        pub actor_id: i64,
        pub target_id: i64,
        pub action: String,
    }

    /// Carries both display names so the downstream notifier can message
    /// each party with the other's card.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_low: i64,
        pub user_high: i64,
        pub low_display_name: String,
        pub high_display_name: String,
    }
}
