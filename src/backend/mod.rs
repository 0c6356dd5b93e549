//! Access to the hosted backend: identity provider, remote procedures and the
//! profile table. The gateway only sees the [`Backend`] trait; [`HostedBackend`]
//! is the reqwest implementation. Passwords and access tokens pass through
//! here and must never be logged.

mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::HostedBackend;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{future::Future, pin::Pin};
use thiserror::Error;

use crate::profile::{Rol, UserProfile};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Remote procedure that creates or refreshes the profile row for an account.
pub const RPC_SYNC_PROFILE: &str = "sync_user_profile";
/// Remote procedure that checks credentials server-side.
pub const RPC_LOGIN_MANUAL: &str = "login_manual";
/// Profile table, joined with `sucursales` for the branch name.
pub const PROFILE_TABLE: &str = "usuarios";
pub const PROFILE_SELECT: &str = "id,email,nombre,apellido,rol,sucursal:sucursales(nombre)";

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("response error: {0}")]
    Decode(String),

    #[error("not found")]
    NotFound,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Account returned by a password grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub nombre: String,
}

/// Row of the profile table with the branch embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub apellido: Option<String>,
    pub rol: Rol,
    #[serde(default)]
    pub sucursal: Option<BranchRef>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            nombre: row.nombre.unwrap_or_default(),
            apellido: row.apellido.unwrap_or_default(),
            rol: row.rol,
            sucursal: row.sucursal.map(|branch| branch.nombre),
        }
    }
}

/// Operations the auth gateway needs from the hosted backend.
pub trait Backend: Send + Sync {
    /// Password grant against the identity provider.
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<AuthUser, BackendError>>;

    /// Ends the provider session held by this client.
    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>>;

    /// Calls a remote procedure; an empty response body is `Value::Null`.
    fn rpc<'a>(
        &'a self,
        function: &'a str,
        params: Value,
    ) -> BoxFuture<'a, Result<Value, BackendError>>;

    /// Reads one profile row by account id.
    fn fetch_profile<'a>(&'a self, user_id: &'a str)
        -> BoxFuture<'a, Result<ProfileRow, BackendError>>;
}
