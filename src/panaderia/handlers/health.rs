use crate::{auth::AuthGateway, panaderia::GIT_COMMIT_HASH};
use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
    Extension,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

#[derive(Serialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    session: String,
}

// axum handler for health
pub async fn health(Extension(gateway): Extension<Arc<AuthGateway>>) -> impl IntoResponse {
    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        session: if gateway.session().load().await.is_some() {
            "present".to_string()
        } else {
            "absent".to_string()
        },
    };

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        Ok(value) => {
            headers.insert("X-App", value);
        }
        Err(err) => error!("Failed to build X-App header: {}", err),
    }

    (headers, Json(health))
}
