//! Scripted [`Backend`] for unit tests.

use super::{AuthUser, Backend, BackendError, BoxFuture, ProfileRow};
use crate::profile::Rol;
use serde_json::Value;
use std::{sync::Mutex, time::Duration};

pub(crate) struct MockBackend {
    pub grant: Result<AuthUser, BackendError>,
    pub grant_delay: Option<Duration>,
    pub sync: Result<Value, BackendError>,
    pub sync_delay: Option<Duration>,
    pub profile: Result<ProfileRow, BackendError>,
    pub profile_delay: Option<Duration>,
    pub manual: Result<Value, BackendError>,
    pub manual_delay: Option<Duration>,
    pub sign_out: Result<(), BackendError>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Backend whose primary path succeeds for an employee of "Centro".
    pub fn accepting() -> Self {
        Self {
            grant: Ok(AuthUser {
                id: "e4da3b7f".to_string(),
                email: Some("sofia@panaderia.dev".to_string()),
            }),
            grant_delay: None,
            sync: Ok(Value::Null),
            sync_delay: None,
            profile: Ok(employee_row()),
            profile_delay: None,
            manual: Err(BackendError::Network("login_manual not scripted".to_string())),
            manual_delay: None,
            sign_out: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose primary path is refused.
    pub fn refusing() -> Self {
        Self {
            grant: Err(BackendError::Http {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call.into());
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

pub(crate) fn employee_row() -> ProfileRow {
    ProfileRow {
        id: "e4da3b7f".to_string(),
        email: "sofia@panaderia.dev".to_string(),
        nombre: Some("Sofia".to_string()),
        apellido: Some("Lara".to_string()),
        rol: Rol::Empleado,
        sucursal: Some(super::BranchRef {
            nombre: "Centro".to_string(),
        }),
    }
}

impl Backend for MockBackend {
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        _password: &'a str,
    ) -> BoxFuture<'a, Result<AuthUser, BackendError>> {
        self.record(format!("grant:{email}"));
        Box::pin(async move {
            pause(self.grant_delay).await;
            self.grant.clone()
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>> {
        self.record("sign_out");
        Box::pin(async move { self.sign_out.clone() })
    }

    fn rpc<'a>(
        &'a self,
        function: &'a str,
        params: Value,
    ) -> BoxFuture<'a, Result<Value, BackendError>> {
        self.record(format!("rpc:{function}"));
        Box::pin(async move {
            match function {
                super::RPC_SYNC_PROFILE if params.get("user_id").is_some() => {
                    pause(self.sync_delay).await;
                    self.sync.clone()
                }
                super::RPC_LOGIN_MANUAL
                    if params.get("email_input").is_some()
                        && params.get("password_input").is_some() =>
                {
                    pause(self.manual_delay).await;
                    self.manual.clone()
                }
                _ => Err(BackendError::Http {
                    status: 404,
                    message: format!("unexpected call to {function}"),
                }),
            }
        })
    }

    fn fetch_profile<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<ProfileRow, BackendError>> {
        self.record(format!("profile:{user_id}"));
        Box::pin(async move {
            pause(self.profile_delay).await;
            self.profile.clone()
        })
    }
}
