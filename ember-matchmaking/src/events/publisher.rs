//! Fire-and-forget event publishing. A failed publish is logged and never
//! surfaces to the caller; downstream consumers handle user-facing
//! delivery, including notifying both parties of a new match.

use ember_shared::clients::rabbitmq::RabbitMQClient;
use ember_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Match, Profile, Reaction};

pub async fn publish_profile_registered(rabbitmq: &RabbitMQClient, profile: &Profile) {
    let event = Event::new(
        "ember-matchmaking",
        routing_keys::PROFILE_REGISTERED,
        payloads::ProfileRegistered {
            identity: profile.identity,
            display_name: profile.display_name.clone(),
        },
    )
    .with_identity(profile.identity);

    if let Err(e) = rabbitmq.publish(routing_keys::PROFILE_REGISTERED, &event).await {
        tracing::error!(error = %e, "failed to publish profile.registered event");
    }
}

pub async fn publish_reaction_recorded(rabbitmq: &RabbitMQClient, reaction: &Reaction) {
    let event = Event::new(
        "ember-matchmaking",
        routing_keys::REACTION_RECORDED,
        payloads::ReactionRecorded {
            actor_id: reaction.actor_id,
            target_id: reaction.target_id,
            action: reaction.action.clone(),
        },
    )
    .with_identity(reaction.actor_id);

    if let Err(e) = rabbitmq.publish(routing_keys::REACTION_RECORDED, &event).await {
        tracing::error!(error = %e, "failed to publish reaction.recorded event");
    }
}

pub async fn publish_match_created(
    rabbitmq: &RabbitMQClient,
    m: &Match,
    low_display_name: &str,
    high_display_name: &str,
) {
    let event = Event::new(
        "ember-matchmaking",
        routing_keys::MATCH_CREATED,
        payloads::MatchCreated {
            match_id: m.id,
            user_low: m.user_low,
            user_high: m.user_high,
            low_display_name: low_display_name.to_string(),
            high_display_name: high_display_name.to_string(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCH_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}
