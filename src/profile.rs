//! The authenticated user's identity, role and optional branch. This is the only
//! entity persisted by the front-end; it carries no secrets and may be logged by
//! id and role, but never alongside credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account. The backend defines `admin` and `empleado`; anything else
/// is kept verbatim so routing can fall back instead of rejecting the profile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rol {
    Admin,
    Empleado,
    Other(String),
}

impl Rol {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Empleado => "empleado",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for Rol {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Self::Admin,
            "empleado" => Self::Empleado,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Rol {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Rol> for String {
    fn from(rol: Rol) -> Self {
        match rol {
            Rol::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub rol: Rol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sucursal: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.rol == Rol::Admin
    }

    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.rol == Rol::Empleado
    }

    /// "Nombre Apellido", trimmed when either part is empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellido).trim().to_string()
    }
}
