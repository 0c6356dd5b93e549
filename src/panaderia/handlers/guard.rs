use crate::{
    auth::AuthGateway,
    roles::{guard, required_role_for, Access},
};
use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::debug;

/// Lets the request into a role-scoped tree or answers `303 See Other`.
///
/// The required role comes from the request path; public paths pass through.
/// The session is read for every guarded request and the granted profile is
/// attached as an extension for the page handlers.
pub async fn require_role(
    Extension(gateway): Extension<Arc<AuthGateway>>,
    mut request: Request,
    next: Next,
) -> Response {
    // nested routers see a stripped uri
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path().to_string(), |uri| uri.path().to_string());

    let Some(required) = required_role_for(&path) else {
        return next.run(request).await;
    };

    match guard(gateway.session().load().await, &required) {
        Access::Granted(profile) => {
            request.extensions_mut().insert(profile);
            next.run(request).await
        }
        Access::Redirect(route) => {
            debug!("{} requires {}, redirecting to {}", path, required, route);
            Redirect::to(route.path()).into_response()
        }
    }
}
