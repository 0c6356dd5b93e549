use crate::session::StoreError;
use thiserror::Error;

/// Failures of the auth gateway. `Display` is meant for logs; pages show
/// [`AuthError::user_message`].
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("email and a password of at least 6 characters are required")]
    InvalidInput,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("could not read profile after authentication")]
    ProfileUnavailable,

    #[error("invalid response")]
    InvalidResponse,

    #[error("credentials incorrect")]
    CredentialsIncorrect,

    #[error("user not found")]
    UserNotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    #[error("could not store session: {0}")]
    Session(#[from] StoreError),
}

impl AuthError {
    /// One generic message per category, safe to show to the person at the counter.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => {
                "Enter your email and a password of at least 6 characters."
            }
            Self::InvalidCredentials | Self::CredentialsIncorrect | Self::UserNotFound => {
                "Invalid email or password."
            }
            Self::ProfileUnavailable | Self::InvalidResponse => {
                "Could not load your profile. Please try again."
            }
            Self::Connection(_) | Self::Timeout => "Connection error. Please try again.",
            Self::Session(_) => "Could not save your session on this terminal.",
        }
    }

    /// True when the credentials themselves were refused.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::CredentialsIncorrect | Self::UserNotFound
        )
    }
}
