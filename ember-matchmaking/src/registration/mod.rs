mod machine;
mod session;

pub use machine::{handle_input, start, Advance, CityResolver, RegistrationInput, GENDERS, TARGETS};
pub use session::{RegistrationSession, SessionStore, Step};
