use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

/// Dialogue steps, in the order they are prompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Gender,
    Name,
    Age,
    CityChoice,
    Target,
    Bio,
    Photo,
}

/// In-progress field accumulator for one identity's dialogue. Nothing here
/// touches a repository until the final step completes.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub gender: Option<String>,
    pub display_name: Option<String>,
    pub age: Option<i32>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub target: Option<String>,
    pub bio: Option<String>,
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegistrationSession {
    pub identity: i64,
    pub step: Step,
    /// City from the identity's existing profile, offered as a one-tap
    /// answer on the city step during an edit dialogue.
    pub previous_city: Option<String>,
    pub draft: ProfileDraft,
}

impl RegistrationSession {
    pub fn new(identity: i64, previous_city: Option<String>) -> Self {
        Self {
            identity,
            step: Step::Gender,
            previous_city,
            draft: ProfileDraft::default(),
        }
    }
}

/// Ephemeral per-identity dialogue state. `begin` silently replaces any
/// session already in progress for the identity; completion and
/// abandonment both end in `discard`.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, RegistrationSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, identity: i64, previous_city: Option<String>) -> RegistrationSession {
        let session = RegistrationSession::new(identity, previous_city);
        self.lock().insert(identity, session.clone());
        session
    }

    pub fn get(&self, identity: i64) -> Option<RegistrationSession> {
        self.lock().get(&identity).cloned()
    }

    pub fn put(&self, session: RegistrationSession) {
        self.lock().insert(session.identity, session);
    }

    pub fn discard(&self, identity: i64) {
        self.lock().remove(&identity);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, RegistrationSession>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
