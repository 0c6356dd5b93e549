//! Response handling for the `login_manual` remote procedure. The procedure
//! answers with a bare result object, an array wrapping it, or either of those
//! with the result nested under `login_manual`. All shape handling lives here.

use super::AuthError;
use crate::{backend::RPC_LOGIN_MANUAL, profile::{Rol, UserProfile}};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level payload of `login_manual`, before unwrapping.
#[derive(Clone, Debug, PartialEq)]
pub enum ManualLoginPayload {
    /// Non-empty array; only the first element is used.
    Rows(Vec<Value>),
    Object(Map<String, Value>),
}

impl TryFrom<Value> for ManualLoginPayload {
    type Error = AuthError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(rows) if !rows.is_empty() => Ok(Self::Rows(rows)),
            Value::Object(map) => Ok(Self::Object(map)),
            _ => Err(AuthError::InvalidResponse),
        }
    }
}

impl ManualLoginPayload {
    /// Reduces every accepted shape to the bare `{success, error?, user?}` value.
    #[must_use]
    pub fn normalize(self) -> Value {
        let candidate = match self {
            Self::Rows(rows) => rows.into_iter().next().unwrap_or(Value::Null),
            Self::Object(map) => Value::Object(map),
        };

        match candidate {
            Value::Object(mut map) => match map.remove(RPC_LOGIN_MANUAL) {
                Some(inner) if !inner.is_null() => inner,
                _ => Value::Object(map),
            },
            other => other,
        }
    }
}

#[derive(Deserialize)]
struct ManualLoginUser {
    id: String,
    email: String,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    apellido: Option<String>,
    rol: Rol,
    #[serde(default, alias = "sucursal_nombre")]
    sucursal: Option<String>,
}

impl From<ManualLoginUser> for UserProfile {
    fn from(user: ManualLoginUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nombre: user.nombre.unwrap_or_default(),
            apellido: user.apellido.unwrap_or_default(),
            rol: user.rol,
            sucursal: user.sucursal.filter(|branch| !branch.is_empty()),
        }
    }
}

/// Turns a raw `login_manual` response into a profile.
///
/// # Errors
/// `InvalidResponse` for unusable payloads, `CredentialsIncorrect` when the
/// result is not successful, `UserNotFound` when no user object is embedded.
pub fn profile_from_response(payload: Value) -> Result<UserProfile, AuthError> {
    let result = ManualLoginPayload::try_from(payload)?.normalize();

    if !result.get("success").is_some_and(truthy) {
        if let Some(reason) = result.get("error").and_then(Value::as_str) {
            debug!("login_manual refused: {}", reason);
        }
        return Err(AuthError::CredentialsIncorrect);
    }

    let user = match result.get("user") {
        Some(user @ Value::Object(_)) => user.clone(),
        _ => return Err(AuthError::UserNotFound),
    };

    serde_json::from_value::<ManualLoginUser>(user)
        .map(UserProfile::from)
        .map_err(|err| {
            debug!("login_manual user is malformed: {}", err);
            AuthError::InvalidResponse
        })
}

/// Loose truthiness: `success` may arrive as a bool, a number or a string.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
