use super::{manual, validate_credentials, AuthError};
use crate::{
    backend::{Backend, BackendError, RPC_LOGIN_MANUAL, RPC_SYNC_PROFILE},
    profile::UserProfile,
    session::Session,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::json;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, info, instrument, warn};

/// Deadline applied to each remote call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Which mechanism authenticated the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Primary,
    Alternate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedIn {
    pub profile: UserProfile,
    pub method: AuthMethod,
}

/// Turns credentials into a stored [`UserProfile`] using the hosted backend.
#[derive(Clone)]
pub struct AuthGateway {
    backend: Arc<dyn Backend>,
    session: Session,
    deadline: Duration,
    fallback: bool,
}

impl AuthGateway {
    pub fn new(backend: Arc<dyn Backend>, session: Session) -> Self {
        Self {
            backend,
            session,
            deadline: DEFAULT_DEADLINE,
            fallback: true,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Enables or disables the alternate path after a primary failure.
    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        tokio::time::timeout(self.deadline, call)
            .await
            .unwrap_or(Err(BackendError::Timeout))
    }

    /// Primary path: password grant, profile sync, profile read, store.
    ///
    /// # Errors
    /// `InvalidCredentials` when the provider refuses (or cannot be reached),
    /// `ProfileUnavailable` when the profile cannot be read afterwards, and
    /// `Session` when it cannot be stored.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        let user = self
            .bounded(
                self.backend
                    .sign_in_with_password(email, password.expose_secret()),
            )
            .await
            .map_err(|err| {
                warn!("Primary sign-in failed: {}", err);
                AuthError::InvalidCredentials
            })?;

        // the row may already exist, so a failed sync is not fatal
        if let Err(err) = self
            .bounded(
                self.backend
                    .rpc(RPC_SYNC_PROFILE, json!({ "user_id": user.id })),
            )
            .await
        {
            warn!("Profile sync failed for {}: {}", user.id, err);
        }

        let row = self
            .bounded(self.backend.fetch_profile(&user.id))
            .await
            .map_err(|err| {
                error!("Failed to read profile {}: {}", user.id, err);
                AuthError::ProfileUnavailable
            })?;

        let profile = UserProfile::from(row);
        self.session.save(&profile).await?;

        info!(user_id = %profile.id, rol = %profile.rol, "signed in");

        Ok(profile)
    }

    /// Alternate path: server-side credential check through `login_manual`.
    ///
    /// # Errors
    /// `InvalidResponse`, `CredentialsIncorrect` or `UserNotFound` depending on
    /// the procedure's answer; `Connection`/`Timeout` when it cannot be called.
    #[instrument(skip(self, password))]
    pub async fn sign_in_alternative(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        let params = json!({
            "email_input": email,
            "password_input": password.expose_secret(),
        });

        let payload = self
            .bounded(self.backend.rpc(RPC_LOGIN_MANUAL, params))
            .await
            .map_err(|err| {
                error!("login_manual call failed: {}", err);
                match err {
                    BackendError::Timeout => AuthError::Timeout,
                    other => AuthError::Connection(other.to_string()),
                }
            })?;

        let profile = manual::profile_from_response(payload).map_err(|err| {
            warn!("Alternate sign-in rejected: {}", err);
            err
        })?;

        self.session.save(&profile).await?;

        info!(user_id = %profile.id, rol = %profile.rol, "signed in (alternate)");

        Ok(profile)
    }

    /// Validates the input, tries the primary path and, on any failure, the
    /// alternate one. The primary error is dropped when the fallback runs.
    ///
    /// # Errors
    /// `InvalidInput` before any network call, otherwise the error of the last
    /// path attempted.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SignedIn, AuthError> {
        if !validate_credentials(email, password.expose_secret()) {
            return Err(AuthError::InvalidInput);
        }

        match self.sign_in(email, password).await {
            Ok(profile) => Ok(SignedIn {
                profile,
                method: AuthMethod::Primary,
            }),
            Err(primary) if self.fallback => {
                info!("Primary sign-in failed ({}), trying login_manual", primary);

                let profile = self.sign_in_alternative(email, password).await?;

                Ok(SignedIn {
                    profile,
                    method: AuthMethod::Alternate,
                })
            }
            Err(primary) => Err(primary),
        }
    }

    /// Closes the provider session and always clears the local one.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        match self.bounded(self.backend.sign_out()).await {
            Ok(()) => debug!("provider session closed"),
            Err(err) => warn!("Remote sign-out failed: {}", err),
        }

        if let Err(err) = self.session.discard().await {
            error!("Failed to clear session: {}", err);
        }
    }
}
