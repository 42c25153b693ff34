//! End-to-end flow over the in-memory repositories: two users register
//! through the dialogue, browse each other, and a reciprocal like turns
//! into exactly one match.

use async_trait::async_trait;
use chrono::Utc;

use ember_matchmaking::matching::{engine, selector};
use ember_matchmaking::models::ReactionKind;
use ember_matchmaking::registration::{self, Advance, CityResolver, RegistrationInput, SessionStore};
use ember_matchmaking::repo::Repositories;

struct OfflineResolver;

#[async_trait]
impl CityResolver for OfflineResolver {
    async fn resolve_city(&self, _latitude: f64, _longitude: f64) -> Result<String, String> {
        Err("geocoding unavailable".to_string())
    }
}

async fn register(
    store: &SessionStore,
    repos: &Repositories,
    identity: i64,
    name: &str,
    target: &str,
    location: (f64, f64),
) {
    registration::start(store, &*repos.profiles, identity)
        .await
        .unwrap();

    let answers = vec![
        RegistrationInput::Text { text: "other".to_string() },
        RegistrationInput::Text { text: name.to_string() },
        RegistrationInput::Text { text: "29".to_string() },
        RegistrationInput::Location { latitude: location.0, longitude: location.1 },
        RegistrationInput::Text { text: target.to_string() },
        RegistrationInput::Text { text: "Hello there.".to_string() },
        RegistrationInput::Skip,
    ];

    for answer in answers {
        let advance = registration::handle_input(
            store,
            &*repos.profiles,
            &OfflineResolver,
            identity,
            answer,
        )
        .await
        .unwrap();
        assert!(
            !matches!(&advance, Advance::Invalid { .. }),
            "unexpected rejection during registration: {advance:?}"
        );
    }

    assert!(repos.profiles.exists(identity).await.unwrap());
}

#[tokio::test]
async fn mutual_likes_create_exactly_one_match() {
    let store = SessionStore::new();
    let repos = Repositories::memory();
    let now = Utc::now();

    // Two users a few hundred meters apart in Moscow.
    register(&store, &repos, 100, "Alice", "Friendship", (55.7558, 37.6173)).await;
    register(&store, &repos, 200, "Bob", "Friendship", (55.7512, 37.6180)).await;

    // Alice browses and sees Bob.
    let candidate = selector::select_candidate(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.filters,
        100,
        now,
    )
    .await
    .unwrap()
    .expect("Bob is eligible");
    assert_eq!(candidate.identity, 200);

    // Alice likes Bob: no match yet.
    let outcome = engine::react(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.matches,
        100,
        200,
        ReactionKind::Like,
        now,
    )
    .await
    .unwrap();
    assert!(outcome.new_match.is_none());

    // Bob is hidden from Alice for the exclusion window.
    let next = selector::select_candidate(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.filters,
        100,
        now,
    )
    .await
    .unwrap();
    assert!(next.is_none());

    // Bob likes Alice back: exactly one match, in canonical order.
    let outcome = engine::react(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.matches,
        200,
        100,
        ReactionKind::Like,
        now,
    )
    .await
    .unwrap();
    let m = outcome.new_match.expect("reciprocal like matches");
    assert_eq!((m.user_low, m.user_high), (100, 200));

    // A redundant reciprocal like reports no new match.
    let outcome = engine::react(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.matches,
        100,
        200,
        ReactionKind::Like,
        now,
    )
    .await
    .unwrap();
    assert!(outcome.new_match.is_none());

    assert_eq!(repos.matches.list_for(100).await.unwrap().len(), 1);
    assert_eq!(repos.matches.list_for(200).await.unwrap().len(), 1);
}

#[tokio::test]
async fn distance_filter_applies_while_browsing() {
    let store = SessionStore::new();
    let repos = Repositories::memory();
    let now = Utc::now();

    register(&store, &repos, 1, "Alex", "Dating", (55.7558, 37.6173)).await; // Moscow
    register(&store, &repos, 2, "Elena", "Dating", (59.9311, 30.3609)).await; // Saint Petersburg

    // Without a filter, Elena shows up despite the distance.
    let candidate = selector::select_candidate(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.filters,
        1,
        now,
    )
    .await
    .unwrap();
    assert!(candidate.is_some());

    // A 10 km cap hides her.
    ember_matchmaking::filters::set_distance_filter(&*repos.filters, 1, Some(10.0))
        .await
        .unwrap();
    let candidate = selector::select_candidate(
        &*repos.profiles,
        &*repos.reactions,
        &*repos.filters,
        1,
        now,
    )
    .await
    .unwrap();
    assert!(candidate.is_none());
}
