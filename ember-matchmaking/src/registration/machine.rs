use async_trait::async_trait;
use serde::Deserialize;

use ember_shared::clients::geocoding::GeocodingClient;
use ember_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewProfile, Profile};
use crate::repo::ProfileRepo;

use super::session::{ProfileDraft, RegistrationSession, SessionStore, Step};

pub const GENDERS: [&str; 3] = ["male", "female", "other"];

/// Canonical relationship-intent tags. Anything else a user types on the
/// target step is kept verbatim.
pub const TARGETS: [&str; 5] = ["Friendship", "Conversation", "Relationship", "Casual", "Dating"];

/// Reverse-geocoding collaborator. Implementations must answer within a
/// bounded time; on failure the dialogue keeps the raw coordinates as the
/// city label rather than stalling.
#[async_trait]
pub trait CityResolver: Send + Sync {
    async fn resolve_city(&self, latitude: f64, longitude: f64) -> Result<String, String>;
}

#[async_trait]
impl CityResolver for GeocodingClient {
    async fn resolve_city(&self, latitude: f64, longitude: f64) -> Result<String, String> {
        self.reverse(latitude, longitude).await
    }
}

/// One already-parsed answer from the chat transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationInput {
    Text { text: String },
    Location { latitude: f64, longitude: f64 },
    /// Take the city stored on the existing profile (edit dialogues only).
    PreviousCity,
    Photo { photo_ref: String },
    /// Valid only on the photo step; the profile photo is optional.
    Skip,
}

/// Outcome of feeding one input to the dialogue.
#[derive(Debug)]
pub enum Advance {
    /// Advanced; prompt the user for this step next.
    Next(Step),
    /// Validation failure: re-prompt the same step, nothing stored.
    Invalid { step: Step, reason: String },
    /// Dialogue finished; the profile has been written.
    Completed(Profile),
}

/// Begins a fresh registration or edit dialogue. An existing profile seeds
/// the previous-city shortcut; a dialogue already in progress for this
/// identity is dropped without writing anything.
pub async fn start(
    store: &SessionStore,
    profiles: &dyn ProfileRepo,
    identity: i64,
) -> AppResult<Step> {
    let previous_city = profiles.get(identity).await?.map(|p| p.city);
    let session = store.begin(identity, previous_city);
    tracing::info!(identity, "registration dialogue started");
    Ok(session.step)
}

/// Feeds one answer to the identity's dialogue. The stored session only
/// moves when the answer validates; the profile is written once, on the
/// final step, as a full replacement.
pub async fn handle_input(
    store: &SessionStore,
    profiles: &dyn ProfileRepo,
    resolver: &dyn CityResolver,
    identity: i64,
    input: RegistrationInput,
) -> AppResult<Advance> {
    let mut session = store.get(identity).ok_or_else(|| {
        AppError::new(
            ErrorCode::RegistrationNotActive,
            "no registration dialogue in progress",
        )
    })?;

    let step = session.step;
    match apply(&mut session, resolver, input).await {
        StepResult::Rejected(reason) => {
            tracing::debug!(identity, step = ?step, %reason, "answer rejected");
            Ok(Advance::Invalid { step, reason })
        }
        StepResult::Advanced(next) => {
            session.step = next;
            store.put(session);
            Ok(Advance::Next(next))
        }
        StepResult::Finished => {
            let profile = profiles.upsert(build_profile(identity, session.draft)?).await?;
            store.discard(identity);
            tracing::info!(identity, "registration completed");
            Ok(Advance::Completed(profile))
        }
    }
}

enum StepResult {
    Advanced(Step),
    Finished,
    Rejected(String),
}

async fn apply(
    session: &mut RegistrationSession,
    resolver: &dyn CityResolver,
    input: RegistrationInput,
) -> StepResult {
    match (session.step, input) {
        (Step::Gender, RegistrationInput::Text { text }) => {
            let gender = text.trim().to_lowercase();
            if !GENDERS.contains(&gender.as_str()) {
                return StepResult::Rejected(format!(
                    "gender must be one of: {}",
                    GENDERS.join(", ")
                ));
            }
            session.draft.gender = Some(gender);
            StepResult::Advanced(Step::Name)
        }

        (Step::Name, RegistrationInput::Text { text }) => {
            let name = text.trim();
            if name.is_empty() || name.chars().count() > 64 {
                return StepResult::Rejected("name must be 1-64 characters".to_string());
            }
            session.draft.display_name = Some(name.to_string());
            StepResult::Advanced(Step::Age)
        }

        (Step::Age, RegistrationInput::Text { text }) => match text.trim().parse::<i32>() {
            Ok(age) if (1..=120).contains(&age) => {
                session.draft.age = Some(age);
                StepResult::Advanced(Step::CityChoice)
            }
            _ => StepResult::Rejected("age must be a whole number between 1 and 120".to_string()),
        },

        (Step::CityChoice, RegistrationInput::Text { text }) => {
            let city = text.trim();
            if city.is_empty() {
                return StepResult::Rejected("city cannot be empty".to_string());
            }
            session.draft.city = Some(city.to_string());
            session.draft.latitude = None;
            session.draft.longitude = None;
            StepResult::Advanced(Step::Target)
        }

        (Step::CityChoice, RegistrationInput::PreviousCity) => match session.previous_city.clone() {
            Some(city) => {
                session.draft.city = Some(city);
                session.draft.latitude = None;
                session.draft.longitude = None;
                StepResult::Advanced(Step::Target)
            }
            None => StepResult::Rejected("there is no previous city on file".to_string()),
        },

        (Step::CityChoice, RegistrationInput::Location { latitude, longitude }) => {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return StepResult::Rejected("coordinates are out of range".to_string());
            }
            let city = match resolver.resolve_city(latitude, longitude).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(error = %e, "reverse geocoding failed, keeping raw coordinates");
                    format!("{latitude:.4}, {longitude:.4}")
                }
            };
            session.draft.city = Some(city);
            session.draft.latitude = Some(latitude);
            session.draft.longitude = Some(longitude);
            StepResult::Advanced(Step::Target)
        }

        (Step::Target, RegistrationInput::Text { text }) => {
            let target = normalize_target(&text);
            if target.is_empty() {
                return StepResult::Rejected("tell me what you are looking for".to_string());
            }
            session.draft.target = Some(target);
            StepResult::Advanced(Step::Bio)
        }

        (Step::Bio, RegistrationInput::Text { text }) => {
            let bio = text.trim();
            if bio.is_empty() {
                return StepResult::Rejected("write a few words about yourself".to_string());
            }
            session.draft.bio = Some(bio.to_string());
            StepResult::Advanced(Step::Photo)
        }

        (Step::Photo, RegistrationInput::Photo { photo_ref }) => {
            session.draft.photo_ref = Some(photo_ref);
            StepResult::Finished
        }

        (Step::Photo, RegistrationInput::Skip) => StepResult::Finished,

        (step, _) => StepResult::Rejected(format!("expected {}", expected(step))),
    }
}

/// Canonicalizes known tags case-insensitively; anything else is kept as
/// typed.
pub fn normalize_target(input: &str) -> String {
    let trimmed = input.trim();
    for canonical in TARGETS {
        if canonical.eq_ignore_ascii_case(trimmed) {
            return canonical.to_string();
        }
    }
    trimmed.to_string()
}

fn expected(step: Step) -> &'static str {
    match step {
        Step::Gender => "a gender: male, female or other",
        Step::Name => "a name",
        Step::Age => "an age",
        Step::CityChoice => "a city name, a location, or the previous city",
        Step::Target => "what you are looking for",
        Step::Bio => "a short bio",
        Step::Photo => "a photo, or skip",
    }
}

fn build_profile(identity: i64, draft: ProfileDraft) -> AppResult<NewProfile> {
    let missing = || AppError::internal("registration draft incomplete");
    Ok(NewProfile {
        identity,
        display_name: draft.display_name.ok_or_else(missing)?,
        gender: draft.gender.ok_or_else(missing)?,
        age: draft.age.ok_or_else(missing)?,
        city: draft.city.ok_or_else(missing)?,
        latitude: draft.latitude,
        longitude: draft.longitude,
        target: draft.target.ok_or_else(missing)?,
        bio: draft.bio.ok_or_else(missing)?,
        photo_ref: draft.photo_ref,
    })
}
