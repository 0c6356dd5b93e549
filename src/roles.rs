//! Role routing: where a profile lands after sign-in and whether it may enter a
//! role-scoped page tree. Guards here only decide; the HTTP layer performs the
//! redirect. A wrong role is answered like a missing session.

use crate::profile::{Rol, UserProfile};
use serde::Serialize;
use std::fmt;

pub mod paths {
    pub const ROOT: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const ADMIN: &str = "/admin";
    pub const EMPLEADO: &str = "/empleado";
}

pub const ADMIN_SECTIONS: &[&str] = &["inventario", "pedidos", "personal", "sucursales"];
pub const EMPLEADO_SECTIONS: &[&str] = &["inventario", "pedidos"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    AdminHome,
    EmployeeHome,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => paths::ROOT,
            Self::Login => paths::LOGIN,
            Self::AdminHome => paths::ADMIN,
            Self::EmployeeHome => paths::EMPLEADO,
        }
    }
}

impl Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

/// Landing route for a signed-in profile; unknown roles go to the root.
#[must_use]
pub fn redirect_target_for(profile: &UserProfile) -> Route {
    match profile.rol {
        Rol::Admin => Route::AdminHome,
        Rol::Empleado => Route::EmployeeHome,
        Rol::Other(_) => Route::Root,
    }
}

/// Role a path requires, or `None` for public paths.
#[must_use]
pub fn required_role_for(path: &str) -> Option<Rol> {
    if in_subtree(path, paths::ADMIN) {
        Some(Rol::Admin)
    } else if in_subtree(path, paths::EMPLEADO) {
        Some(Rol::Empleado)
    } else {
        None
    }
}

fn in_subtree(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Granted(UserProfile),
    Redirect(Route),
}

/// Decides whether `profile` may enter a tree that requires `required`.
#[must_use]
pub fn guard(profile: Option<UserProfile>, required: &Rol) -> Access {
    match profile {
        Some(profile) if &profile.rol == required => Access::Granted(profile),
        _ => Access::Redirect(Route::Login),
    }
}

/// Sections of the page tree a role can open.
#[must_use]
pub fn sections_for(rol: &Rol) -> &'static [&'static str] {
    match rol {
        Rol::Admin => ADMIN_SECTIONS,
        Rol::Empleado => EMPLEADO_SECTIONS,
        Rol::Other(_) => &[],
    }
}
