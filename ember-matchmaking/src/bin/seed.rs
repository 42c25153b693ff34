//! Resets the development database and loads a set of fixture profiles
//! covering every gender, target tag, and a spread of cities. Destructive;
//! development only.

use chrono::Utc;
use diesel::prelude::*;

use ember_matchmaking::config::AppConfig;
use ember_matchmaking::models::NewProfile;
use ember_matchmaking::schema::{filter_settings, matches, profiles, reactions};

fn fixture(
    identity: i64,
    name: &str,
    gender: &str,
    age: i32,
    city: &str,
    location: (f64, f64),
    target: &str,
    bio: &str,
) -> NewProfile {
    NewProfile {
        identity,
        display_name: name.to_string(),
        gender: gender.to_string(),
        age,
        city: city.to_string(),
        latitude: Some(location.0),
        longitude: Some(location.1),
        target: target.to_string(),
        bio: bio.to_string(),
        photo_ref: None,
    }
}

fn fixtures() -> Vec<NewProfile> {
    vec![
        fixture(1001, "Alex", "male", 25, "Moscow", (55.7558, 37.6173), "Relationship",
            "Love travelling and reading. Looking for something serious."),
        fixture(1002, "Maria", "female", 23, "Moscow", (55.7512, 37.6180), "Conversation",
            "Painter into modern art. Want to meet interesting people to talk to."),
        fixture(1003, "Dmitri", "male", 30, "Saint Petersburg", (59.9311, 30.3609), "Friendship",
            "Programmer, into technology. Looking for friends with shared interests."),
        fixture(1004, "Elena", "female", 27, "Saint Petersburg", (59.9342, 30.3351), "Dating",
            "Photographer, love nature and the outdoors. Open to meeting new people."),
        fixture(1005, "Andrew", "male", 28, "Kazan", (55.8304, 49.0661), "Casual",
            "Musician, play the guitar. Just here for a good time."),
        fixture(1006, "Anna", "female", 24, "Yekaterinburg", (56.8431, 60.6454), "Relationship",
            "Doctor, love helping people. Looking for a reliable partner."),
        fixture(1007, "Max", "male", 26, "Novosibirsk", (55.0084, 82.9357), "Conversation",
            "History teacher, love travelling and learning about cultures."),
        fixture(1008, "Sofia", "female", 22, "Krasnodar", (45.0355, 38.9753), "Friendship",
            "Journalism student, love writing. Looking for friends to chat with."),
        fixture(1009, "Igor", "male", 32, "Rostov-on-Don", (47.2357, 39.7015), "Dating",
            "Chef, I cook incredible food. Hoping to find someone special."),
        fixture(1010, "Victoria", "female", 29, "Voronezh", (51.6720, 39.1843), "Casual",
            "Interior designer, creative soul. Just want to have fun."),
    ]
}

fn main() -> anyhow::Result<()> {
    ember_shared::telemetry::init_tracing("ember-seed");

    let config = AppConfig::load()?;
    let mut conn = PgConnection::establish(&config.database_url)?;

    tracing::warn!("wiping matchmaking tables");
    diesel::delete(matches::table).execute(&mut conn)?;
    diesel::delete(reactions::table).execute(&mut conn)?;
    diesel::delete(filter_settings::table).execute(&mut conn)?;
    diesel::delete(profiles::table).execute(&mut conn)?;

    let now = Utc::now();
    let rows = fixtures();
    let count = rows.len();
    for profile in rows {
        diesel::insert_into(profiles::table)
            .values((
                &profile,
                profiles::created_at.eq(now),
                profiles::updated_at.eq(now),
            ))
            .execute(&mut conn)?;
        tracing::info!(
            identity = profile.identity,
            name = %profile.display_name,
            city = %profile.city,
            "fixture profile inserted"
        );
    }

    tracing::info!(profiles = count, "database seeded");
    Ok(())
}
