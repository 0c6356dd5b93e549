use super::ErrorBody;
use crate::{
    auth::{AuthError, AuthGateway, AuthMethod},
    profile::UserProfile,
    roles::{redirect_target_for, Route},
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Extension,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    redirect: Route,
    method: AuthMethod,
    user: UserProfile,
}

fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidInput => StatusCode::BAD_REQUEST,
        err if err.is_rejection() => StatusCode::UNAUTHORIZED,
        AuthError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// `GET /login`: already signed-in terminals go straight to their landing route.
pub async fn login_page(Extension(gateway): Extension<Arc<AuthGateway>>) -> Response {
    match gateway.session().load().await {
        Some(profile) => Redirect::to(redirect_target_for(&profile).path()).into_response(),
        None => Json(json!({ "authenticated": false })).into_response(),
    }
}

/// `POST /login`
pub async fn login(
    Extension(gateway): Extension<Arc<AuthGateway>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let password = SecretString::from(request.password);

    match gateway.login(request.email.trim(), &password).await {
        Ok(signed_in) => {
            let redirect = redirect_target_for(&signed_in.profile);

            info!(
                user_id = %signed_in.profile.id,
                method = ?signed_in.method,
                "login accepted, landing on {}",
                redirect
            );

            Json(LoginResponse {
                redirect,
                method: signed_in.method,
                user: signed_in.profile,
            })
            .into_response()
        }
        Err(err) => {
            error!("Login failed: {}", err);

            (status_for(&err), Json(ErrorBody::new(err.user_message()))).into_response()
        }
    }
}

/// `POST /logout`: always succeeds, even if the provider is unreachable.
pub async fn logout(Extension(gateway): Extension<Arc<AuthGateway>>) -> StatusCode {
    gateway.sign_out().await;

    StatusCode::NO_CONTENT
}

/// `GET /session`: the stored profile, or 204 when nobody is signed in.
pub async fn session(Extension(gateway): Extension<Arc<AuthGateway>>) -> Response {
    gateway.session().load().await.map_or_else(
        || StatusCode::NO_CONTENT.into_response(),
        |profile| Json(profile).into_response(),
    )
}
