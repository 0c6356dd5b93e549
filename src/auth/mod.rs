//! Authentication against the hosted backend. Two mechanisms exist: the
//! provider's password grant (primary) and the `login_manual` procedure
//! (alternate). [`AuthGateway::login`] runs the pre-flight check, the primary
//! path, and the alternate path after any primary failure.
//!
//! Passwords travel as [`secrecy::SecretString`] and are only exposed at the
//! HTTP boundary; nothing in this module logs them.

mod error;
mod gateway;
pub mod manual;

pub use error::AuthError;
pub use gateway::{AuthGateway, AuthMethod, SignedIn, DEFAULT_DEADLINE};

/// Minimum password length accepted before contacting the backend.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// True iff both fields are non-empty and the password has at least
/// [`MIN_PASSWORD_CHARS`] characters.
#[must_use]
pub fn validate_credentials(email: &str, password: &str) -> bool {
    !email.is_empty() && !password.is_empty() && password.chars().count() >= MIN_PASSWORD_CHARS
}
