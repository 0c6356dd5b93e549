use super::{
    AuthUser, Backend, BackendError, BoxFuture, ProfileRow, PROFILE_SELECT, PROFILE_TABLE,
};
use crate::panaderia::APP_USER_AGENT;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::{sync::Mutex, time::Duration};
use tracing::{debug, error, instrument};
use url::Url;

/// Maximum number of error body characters kept in `BackendError::Http`.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// reqwest client for the hosted backend (`/auth/v1` and `/rest/v1`).
///
/// The access token from the last password grant is kept in memory and sent on
/// later calls; without one, the anon key is the bearer.
pub struct HostedBackend {
    http: Client,
    base_url: String,
    anon_key: SecretString,
    access_token: Mutex<Option<SecretString>>,
}

impl std::fmt::Debug for HostedBackend {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HostedBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HostedBackend {
    /// Builds a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        anon_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|err| BackendError::Config(format!("invalid backend URL: {err}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(BackendError::Config(format!(
                    "unsupported scheme {scheme} in backend URL"
                )))
            }
        }

        if parsed.host_str().is_none() {
            return Err(BackendError::Config(
                "backend URL must include a host".to_string(),
            ));
        }

        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| BackendError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            anon_key,
            access_token: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn token_slot(&self) -> std::sync::MutexGuard<'_, Option<SecretString>> {
        self.access_token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn bearer(&self) -> String {
        let token = self
            .token_slot()
            .as_ref()
            .map(|token| token.expose_secret().to_string());
        let token = token.unwrap_or_else(|| self.anon_key.expose_secret().to_string());

        format!("Bearer {token}")
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", self.anon_key.expose_secret())
            .header("Authorization", self.bearer())
    }

    /// Password grant; keeps the access token for later calls.
    #[instrument(skip(self, password))]
    pub async fn password_grant(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, BackendError> {
        let url = self.endpoint("/auth/v1/token");

        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", self.anon_key.expose_secret())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let token: TokenResponse = read_json(response).await?;
        *self.token_slot() = Some(SecretString::from(token.access_token));

        debug!(user_id = %token.user.id, "password grant accepted");

        Ok(token.user)
    }

    /// Revokes the held access token, if any, and forgets it.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), BackendError> {
        let Some(token) = self.token_slot().take() else {
            debug!("no provider session to close");
            return Ok(());
        };

        let url = self.endpoint("/auth/v1/logout");

        let response = self
            .http
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .header("Authorization", format!("Bearer {}", token.expose_secret()))
            .send()
            .await?;

        check_status(response).await
    }

    /// Calls `/rest/v1/rpc/{function}` with `params` as the JSON body.
    #[instrument(skip(self, params))]
    pub async fn call(&self, function: &str, params: Value) -> Result<Value, BackendError> {
        let url = self.endpoint(&format!("/rest/v1/rpc/{function}"));

        let response = self
            .authorized(self.http.post(&url))
            .json(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|err| BackendError::Decode(format!("failed to decode RPC response: {err}")))
    }

    /// Reads the profile row of `user_id` with the branch name embedded.
    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: &str) -> Result<ProfileRow, BackendError> {
        let url = self.endpoint(&format!("/rest/v1/{PROFILE_TABLE}"));
        let filter = format!("eq.{user_id}");

        let response = self
            .authorized(self.http.get(&url))
            .query(&[("select", PROFILE_SELECT), ("id", filter.as_str())])
            .send()
            .await?;

        let rows: Vec<ProfileRow> = read_json(response).await?;

        rows.into_iter().next().ok_or(BackendError::NotFound)
    }
}

impl Backend for HostedBackend {
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<AuthUser, BackendError>> {
        Box::pin(self.password_grant(email, password))
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>> {
        Box::pin(self.logout())
    }

    fn rpc<'a>(
        &'a self,
        function: &'a str,
        params: Value,
    ) -> BoxFuture<'a, Result<Value, BackendError>> {
        Box::pin(self.call(function, params))
    }

    fn fetch_profile<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<ProfileRow, BackendError>> {
        Box::pin(self.profile(user_id))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|err| BackendError::Decode(format!("failed to decode response: {err}")))
}

async fn check_status(response: Response) -> Result<(), BackendError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = sanitize_body(&error_message(&body));

    error!("backend request failed ({}): {}", status, message);

    BackendError::Http { status, message }
}

/// Picks the human readable part of an error body, if it is JSON.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|field| value[*field].as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

fn sanitize_body(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() > MAX_ERROR_CHARS {
        let truncated: String = collapsed.chars().take(MAX_ERROR_CHARS).collect();
        format!("{truncated}...")
    } else {
        collapsed
    }
}
