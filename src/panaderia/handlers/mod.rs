pub mod auth;
pub mod guard;
pub mod health;
pub mod pages;

use serde::Serialize;

/// Error body shown to the terminal; carries a generic message only.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
